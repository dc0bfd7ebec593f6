//! Parsing TLC `-tool` mode output.
//!
//! In tool mode every message is framed:
//!
//! ```text
//! @!@!@STARTMSG 2199:0 @!@!@
//! 1234 states generated, 567 distinct states found, 0 states left on queue.
//! @!@!@ENDMSG 2199 @!@!@
//! ```
//!
//! The number before the colon is the message code, the one after it the
//! message class.

use chrono::NaiveDateTime;

const START_MARKER: &str = "@!@!@STARTMSG ";
const END_MARKER: &str = "@!@!@ENDMSG ";
const MARKER_TAIL: &str = " @!@!@";

/// "Starting... (2021-03-04 05:06:07)"
pub const MSG_STARTING: u32 = 2185;
/// "Finished in 02s at (2021-03-04 05:06:09)"
pub const MSG_FINISHED: u32 = 2186;
/// "The depth of the complete state graph search is 12."
pub const MSG_SEARCH_DEPTH: u32 = 2194;
/// Final state counts
pub const MSG_STATS: u32 = 2199;
/// Periodic progress line carrying the same counts
pub const MSG_PROGRESS: u32 = 2200;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageClass {
    Info,
    Error,
    TlcBug,
    Warning,
    State,
    Other(u32),
}

impl From<u32> for MessageClass {
    fn from(class: u32) -> Self {
        match class {
            0 => MessageClass::Info,
            1 => MessageClass::Error,
            2 => MessageClass::TlcBug,
            3 => MessageClass::Warning,
            4 => MessageClass::State,
            other => MessageClass::Other(other),
        }
    }
}

/// One framed message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolMessage {
    pub code: u32,
    pub class: MessageClass,
    pub body: String,
}

/// Split tool-mode output into messages. Text outside frames is dropped;
/// an unterminated frame at the end still yields its message.
pub fn parse_messages(output: &str) -> Vec<ToolMessage> {
    let mut messages = Vec::new();
    let mut current: Option<(u32, MessageClass, Vec<&str>)> = None;

    for line in output.lines() {
        if let Some(header) = line
            .strip_prefix(START_MARKER)
            .and_then(|rest| rest.strip_suffix(MARKER_TAIL))
        {
            if let Some((code, class, body)) = current.take() {
                messages.push(finish(code, class, body));
            }
            let (code, class) = header.split_once(':').unwrap_or((header, "0"));
            match (code.trim().parse(), class.trim().parse::<u32>()) {
                (Ok(code), Ok(class)) => current = Some((code, class.into(), Vec::new())),
                _ => tracing::debug!("ignoring malformed TLC message header: {}", line),
            }
        } else if line.starts_with(END_MARKER) {
            if let Some((code, class, body)) = current.take() {
                messages.push(finish(code, class, body));
            }
        } else if let Some((_, _, body)) = current.as_mut() {
            body.push(line);
        }
    }
    if let Some((code, class, body)) = current {
        messages.push(finish(code, class, body));
    }
    messages
}

fn finish(code: u32, class: MessageClass, body: Vec<&str>) -> ToolMessage {
    ToolMessage {
        code,
        class,
        body: body.join("\n"),
    }
}

/// Everything the batch needs from one TLC run's output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub start_time: Option<NaiveDateTime>,
    pub diameter: u64,
    pub total_states: u64,
    pub distinct_states: u64,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl RunSummary {
    pub fn from_output(output: &str) -> Self {
        let mut summary = RunSummary::default();
        let mut final_stats = false;

        for message in parse_messages(output) {
            match message.class {
                MessageClass::Error | MessageClass::TlcBug => summary.errors.push(message.body.clone()),
                MessageClass::Warning => summary.warnings.push(message.body.clone()),
                _ => {}
            }

            match message.code {
                MSG_STARTING => summary.start_time = bracketed_time(&message.body),
                MSG_SEARCH_DEPTH => {
                    if let Some(depth) = last_number(&message.body) {
                        summary.diameter = depth;
                    }
                }
                MSG_STATS => {
                    final_stats = true;
                    summary.apply_counts(&message.body);
                }
                MSG_PROGRESS if !final_stats => summary.apply_counts(&message.body),
                _ => {}
            }
        }
        summary
    }

    fn apply_counts(&mut self, body: &str) {
        if let Some(total) = count_before(body, " states generated") {
            self.total_states = total;
        }
        if let Some(distinct) = count_before(body, " distinct states found") {
            self.distinct_states = distinct;
        }
    }
}

/// Integer immediately before `suffix`, allowing `1,234` grouping
fn count_before(body: &str, suffix: &str) -> Option<u64> {
    let head = &body[..body.find(suffix)?];
    let token = head.split_whitespace().last()?;
    token.replace(',', "").parse().ok()
}

fn last_number(body: &str) -> Option<u64> {
    body.split(|c: char| !c.is_ascii_digit() && c != ',')
        .filter(|t| t.chars().any(|c| c.is_ascii_digit()))
        .last()
        .and_then(|t| t.replace(',', "").parse().ok())
}

fn bracketed_time(body: &str) -> Option<NaiveDateTime> {
    let open = body.rfind('(')?;
    let close = open + body[open..].find(')')?;
    NaiveDateTime::parse_from_str(body[open + 1..close].trim(), TIME_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE: &str = "\
@!@!@STARTMSG 2262:0 @!@!@
TLC2 Version 2.16 of 31 December 2020
@!@!@ENDMSG 2262 @!@!@
@!@!@STARTMSG 2185:0 @!@!@
Starting... (2021-03-04 05:06:07)
@!@!@ENDMSG 2185 @!@!@
@!@!@STARTMSG 2200:0 @!@!@
Progress(3) at 2021-03-04 05:06:08: 120 states generated (120 s/min), 40 distinct states found (40 ds/min), 3 states left on queue.
@!@!@ENDMSG 2200 @!@!@
@!@!@STARTMSG 1000:3 @!@!@
Please run the Java VM which executes TLC with a throughput optimized garbage collector.
@!@!@ENDMSG 1000 @!@!@
@!@!@STARTMSG 2199:0 @!@!@
1,234 states generated, 567 distinct states found, 0 states left on queue.
@!@!@ENDMSG 2199 @!@!@
@!@!@STARTMSG 2194:0 @!@!@
The depth of the complete state graph search is 12.
@!@!@ENDMSG 2194 @!@!@
@!@!@STARTMSG 2186:0 @!@!@
Finished in 02s at (2021-03-04 05:06:09)
@!@!@ENDMSG 2186 @!@!@
";

    #[test]
    fn test_parse_messages_frames() {
        let messages = parse_messages(SAMPLE);
        assert_eq!(messages.len(), 7);
        assert_eq!(messages[0].code, 2262);
        assert_eq!(messages[3].class, MessageClass::Warning);
        assert_eq!(messages[1].body, "Starting... (2021-03-04 05:06:07)");
    }

    #[test]
    fn test_summary_from_sample() {
        let summary = RunSummary::from_output(SAMPLE);
        assert_eq!(
            summary.start_time,
            NaiveDate::from_ymd_opt(2021, 3, 4).unwrap().and_hms_opt(5, 6, 7)
        );
        assert_eq!(summary.total_states, 1234);
        assert_eq!(summary.distinct_states, 567);
        assert_eq!(summary.diameter, 12);
        assert!(summary.errors.is_empty());
        assert_eq!(summary.warnings.len(), 1);
    }

    #[test]
    fn test_progress_counts_used_without_final_stats() {
        let output = "\
@!@!@STARTMSG 2200:0 @!@!@
Progress(3) at 2021-03-04 05:06:08: 120 states generated (120 s/min), 40 distinct states found (40 ds/min), 3 states left on queue.
@!@!@ENDMSG 2200 @!@!@
@!@!@STARTMSG 1000:1 @!@!@
TLC threw an unexpected exception.
@!@!@ENDMSG 1000 @!@!@
";
        let summary = RunSummary::from_output(output);
        assert_eq!(summary.total_states, 120);
        assert_eq!(summary.distinct_states, 40);
        assert_eq!(summary.errors, vec!["TLC threw an unexpected exception."]);
    }

    #[test]
    fn test_unterminated_and_stray_text() {
        let output = "noise\n@!@!@STARTMSG 2194:0 @!@!@\nThe depth of the complete state graph search is 7.";
        let messages = parse_messages(output);
        assert_eq!(messages.len(), 1);
        assert_eq!(RunSummary::from_output(output).diameter, 7);
    }
}
