//! The sectioned checker document and its translation to TLC input.
//!
//! ```text
//! [options]
//! target: crdt/StateAWSet.tla
//! model name: model/StateAWSet (2 clients, 2 chars) 20210304-050607
//! worker num: 4
//!
//! [behavior]
//! temporal formula: Spec
//!
//! [constants]
//! Data: [model value]<symmetrical>{a, b}
//! NotMsg: [model value]
//! Read(r): ReadStateAWSet(r)
//! ```
//!
//! A document is turned into a root module extending the target plus a
//! matching `.cfg`, the same shape the TLA+ Toolbox generates for a model.

use crate::{BatchError, BatchResult};
use indexmap::IndexSet;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Document template for one experiment.
///
/// `workers` and `distinct_limit` are filled once per batch; the symbol sets
/// are deferred to the per-experiment pass.
pub const CONFIG_TEMPLATE: &str = r#"[options]
target: {target}
model name: {model}
worker num: {workers}

[behavior]
temporal formula: Spec

[invariants]
SEC: SEC!SEC

[constants]
Data: [model value]<symmetrical>{{{data}}}
Replica: [model value]<symmetrical>{{{replicas}}}
NotMsg: [model value]
Read(r): {read_operator}(r)

[state constraint]
SC: TLCSet("exit", TLCGet("distinct") > {distinct_limit})
"#;

/// Placeholders kept open by the batch-wide binding pass
pub const DEFERRED_SYMBOLS: &[&str] = &["replicas", "data"];

const MODEL_VALUE: &str = "[model value]";
const SYMMETRICAL: &str = "<symmetrical>";

/// Value assigned to a constant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstantValue {
    /// The constant is a model value named after itself
    ModelValue,
    /// A set of fresh model values
    ModelValueSet { values: Vec<String>, symmetric: bool },
    /// Any other TLA+ expression
    Expression(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub name: String,
    /// Parameter list of an operator override, e.g. `r` for `Read(r)`
    pub params: Option<String>,
    pub value: ConstantValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Behavior {
    TemporalFormula(String),
    InitNext { init: String, next: String },
}

/// Named TLA+ expression (invariant, property, state constraint)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Named {
    pub name: String,
    pub expr: String,
}

/// Parsed checker document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerDocument {
    pub target: PathBuf,
    pub model_name: String,
    pub workers: Option<usize>,
    pub behavior: Behavior,
    pub invariants: Vec<Named>,
    pub properties: Vec<Named>,
    pub constants: Vec<Constant>,
    pub state_constraints: Vec<Named>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Options,
    Behavior,
    Invariants,
    Properties,
    Constants,
    StateConstraint,
}

fn doc_error(line: usize, message: impl Into<String>) -> BatchError {
    BatchError::Document {
        line,
        message: message.into(),
    }
}

impl CheckerDocument {
    /// Parse a document from any reader; an in-memory cursor works.
    pub fn parse<R: BufRead>(reader: R) -> BatchResult<Self> {
        let mut target = None;
        let mut model_name = String::new();
        let mut workers = None;
        let mut temporal = None;
        let mut init = None;
        let mut next = None;
        let mut invariants = Vec::new();
        let mut properties = Vec::new();
        let mut constants = Vec::new();
        let mut state_constraints = Vec::new();
        let mut section = None;

        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = Some(match header.trim() {
                    "options" => Section::Options,
                    "behavior" => Section::Behavior,
                    "invariants" => Section::Invariants,
                    "properties" => Section::Properties,
                    "constants" => Section::Constants,
                    "state constraint" => Section::StateConstraint,
                    other => return Err(doc_error(line_no, format!("unknown section [{}]", other))),
                });
                continue;
            }

            let section = section.ok_or_else(|| doc_error(line_no, "entry before any section"))?;
            let (key, value) = line
                .split_once(':')
                .map(|(k, v)| (k.trim(), v.trim()))
                .ok_or_else(|| doc_error(line_no, "expected `key: value`"))?;
            if key.is_empty() {
                return Err(doc_error(line_no, "empty key"));
            }

            match section {
                Section::Options => match key {
                    "target" => target = Some(PathBuf::from(value)),
                    "model name" => model_name = value.to_string(),
                    "worker num" => {
                        let count = value
                            .parse::<usize>()
                            .map_err(|_| doc_error(line_no, format!("bad worker num `{}`", value)))?;
                        workers = Some(count);
                    }
                    other => return Err(doc_error(line_no, format!("unknown option `{}`", other))),
                },
                Section::Behavior => match key {
                    "temporal formula" => temporal = Some(value.to_string()),
                    "init" => init = Some(value.to_string()),
                    "next" => next = Some(value.to_string()),
                    other => {
                        return Err(doc_error(line_no, format!("unknown behavior key `{}`", other)))
                    }
                },
                Section::Invariants => invariants.push(named(key, value)),
                Section::Properties => properties.push(named(key, value)),
                Section::StateConstraint => state_constraints.push(named(key, value)),
                Section::Constants => constants.push(parse_constant(line_no, key, value)?),
            }
        }

        let target = target.ok_or_else(|| doc_error(0, "missing `target` option"))?;
        let behavior = match (temporal, init, next) {
            (Some(formula), None, None) => Behavior::TemporalFormula(formula),
            (None, Some(init), Some(next)) => Behavior::InitNext { init, next },
            _ => {
                return Err(doc_error(
                    0,
                    "behavior needs either `temporal formula` or both `init` and `next`",
                ))
            }
        };

        Ok(Self {
            target,
            model_name,
            workers,
            behavior,
            invariants,
            properties,
            constants,
            state_constraints,
        })
    }

    /// Module name of the target specification
    pub fn target_module(&self) -> BatchResult<String> {
        module_name(&self.target)
    }

    /// Directory TLC must run in to resolve the target module
    pub fn target_dir(&self) -> &Path {
        match self.target.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    /// Model values introduced by model-value sets, deduplicated in order
    fn model_values(&self) -> IndexSet<&str> {
        self.constants
            .iter()
            .filter_map(|c| match &c.value {
                ConstantValue::ModelValueSet { values, .. } => Some(values),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
            .collect()
    }

    fn symmetric_sets(&self) -> Vec<&str> {
        self.constants
            .iter()
            .filter(|c| {
                matches!(
                    c.value,
                    ConstantValue::ModelValueSet {
                        symmetric: true,
                        ..
                    }
                )
            })
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Root module extending the target, named `module`
    pub fn render_module(&self, module: &str) -> BatchResult<String> {
        let mut out = format!("---- MODULE {} ----\nEXTENDS {}, TLC\n\n", module, self.target_module()?);

        let model_values = self.model_values();
        if !model_values.is_empty() {
            let list: Vec<_> = model_values.into_iter().collect();
            out.push_str(&format!("CONSTANTS\n    {}\n\n", list.join(", ")));
        }

        for constant in &self.constants {
            match (&constant.value, &constant.params) {
                (ConstantValue::ModelValue, _) => {}
                (ConstantValue::ModelValueSet { values, .. }, _) => {
                    out.push_str(&format!("const_{} == {{{}}}\n", constant.name, values.join(", ")));
                }
                (ConstantValue::Expression(expr), Some(params)) => {
                    out.push_str(&format!("def_{}({}) == {}\n", constant.name, params, expr));
                }
                (ConstantValue::Expression(expr), None) => {
                    out.push_str(&format!("const_{} == {}\n", constant.name, expr));
                }
            }
        }

        let symmetric = self.symmetric_sets();
        if !symmetric.is_empty() {
            let perms: Vec<_> = symmetric
                .iter()
                .map(|name| format!("Permutations(const_{})", name))
                .collect();
            out.push_str(&format!("symm_ == {}\n", perms.join(" \\cup ")));
        }

        match &self.behavior {
            Behavior::TemporalFormula(formula) => out.push_str(&format!("spec_ == {}\n", formula)),
            Behavior::InitNext { init, next } => {
                out.push_str(&format!("init_ == {}\nnext_ == {}\n", init, next));
            }
        }
        for (prefix, group) in [
            ("inv", &self.invariants),
            ("prop", &self.properties),
            ("constr", &self.state_constraints),
        ] {
            for item in group {
                out.push_str(&format!("{}_{} == {}\n", prefix, item.name, item.expr));
            }
        }

        out.push_str("====\n");
        Ok(out)
    }

    /// `.cfg` matching [`render_module`](Self::render_module)
    pub fn render_cfg(&self) -> String {
        let mut out = String::from("CONSTANTS\n");
        for value in self.model_values() {
            out.push_str(&format!("    {} = {}\n", value, value));
        }
        for constant in &self.constants {
            match (&constant.value, &constant.params) {
                (ConstantValue::ModelValue, _) => {
                    out.push_str(&format!("    {} = {}\n", constant.name, constant.name));
                }
                (ConstantValue::Expression(_), Some(_)) => {
                    out.push_str(&format!("    {} <- def_{}\n", constant.name, constant.name));
                }
                _ => out.push_str(&format!("    {} <- const_{}\n", constant.name, constant.name)),
            }
        }
        out.push('\n');

        if !self.symmetric_sets().is_empty() {
            out.push_str("SYMMETRY symm_\n");
        }
        match self.behavior {
            Behavior::TemporalFormula(_) => out.push_str("SPECIFICATION spec_\n"),
            Behavior::InitNext { .. } => out.push_str("INIT init_\nNEXT next_\n"),
        }
        for (keyword, prefix, group) in [
            ("INVARIANT", "inv", &self.invariants),
            ("PROPERTY", "prop", &self.properties),
            ("CONSTRAINT", "constr", &self.state_constraints),
        ] {
            for item in group {
                out.push_str(&format!("{} {}_{}\n", keyword, prefix, item.name));
            }
        }
        out
    }
}

fn named(key: &str, value: &str) -> Named {
    let name = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    Named {
        name,
        expr: value.to_string(),
    }
}

fn parse_constant(line: usize, key: &str, value: &str) -> BatchResult<Constant> {
    let (name, params) = match key.split_once('(') {
        Some((name, rest)) => {
            let params = rest
                .strip_suffix(')')
                .ok_or_else(|| doc_error(line, format!("unclosed parameter list in `{}`", key)))?;
            (name.trim().to_string(), Some(params.trim().to_string()))
        }
        None => (key.to_string(), None),
    };

    let value = match value.strip_prefix(MODEL_VALUE) {
        Some(rest) if params.is_none() => {
            let rest = rest.trim();
            let (symmetric, rest) = match rest.strip_prefix(SYMMETRICAL) {
                Some(rest) => (true, rest.trim()),
                None => (false, rest),
            };
            if rest.is_empty() && !symmetric {
                ConstantValue::ModelValue
            } else {
                let inner = rest
                    .strip_prefix('{')
                    .and_then(|r| r.strip_suffix('}'))
                    .ok_or_else(|| doc_error(line, format!("expected `{{...}}` after {}", MODEL_VALUE)))?;
                let values: Vec<String> = inner
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(String::from)
                    .collect();
                if values.is_empty() {
                    return Err(doc_error(line, format!("empty model value set for `{}`", name)));
                }
                ConstantValue::ModelValueSet { values, symmetric }
            }
        }
        Some(_) => {
            return Err(doc_error(line, format!("operator `{}` cannot be a model value", name)))
        }
        None => ConstantValue::Expression(value.to_string()),
    };

    Ok(Constant {
        name,
        params,
        value,
    })
}

fn module_name(path: &Path) -> BatchResult<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(String::from)
        .ok_or_else(|| BatchError::InvalidTarget(path.to_path_buf()))
}
