//! Tolerant JSON extraction from free-text model replies.
//!
//! A model reply is not guaranteed to be JSON, or to contain only JSON.
//! Reasoning models emit a free-text preamble before the payload, and most
//! models occasionally wrap the payload in prose or markdown. The extractor
//! takes the span from the first `{` to the last `}` as the payload and
//! everything before the first `{` as the model's "thinking".
//!
//! The span is greedy and does not balance brackets: a reply carrying two
//! unrelated top-level objects yields one span covering both, and decoding
//! that span fails. Callers substitute their task-specific default.

use serde::de::DeserializeOwned;

/// A model reply split into its reasoning preamble and JSON payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplySplit {
    /// Everything before the first `{`, or the whole reply if there is none.
    pub thinking: String,
    /// The first `{` through the last `}` inclusive, or empty.
    pub json_fragment: String,
}

impl ReplySplit {
    /// Returns whether a candidate JSON span was found.
    #[must_use]
    pub fn has_fragment(&self) -> bool {
        !self.json_fragment.is_empty()
    }
}

/// Splits a raw reply into thinking text and a candidate JSON fragment.
#[must_use]
pub fn split_reply(raw: &str) -> ReplySplit {
    let Some(start) = raw.find('{') else {
        return ReplySplit {
            thinking: raw.to_string(),
            json_fragment: String::new(),
        };
    };

    ReplySplit {
        thinking: raw[..start].to_string(),
        json_fragment: brace_span(raw).unwrap_or_default().to_string(),
    }
}

/// Decodes a fragment produced by [`split_reply`].
///
/// An empty fragment fails like any other malformed input.
///
/// # Errors
///
/// Returns the decoder error if the fragment is not a valid `T`.
pub fn decode_fragment<T: DeserializeOwned>(fragment: &str) -> serde_json::Result<T> {
    serde_json::from_str(fragment)
}

/// Decodes a raw reply, trying the whole string before the brace span.
///
/// # Errors
///
/// Returns the brace-span decoder error if both attempts fail, or the
/// whole-string error if the reply contains no brace span at all.
pub fn decode_tolerant<T: DeserializeOwned>(raw: &str) -> serde_json::Result<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Ok(value),
        Err(whole) => match brace_span(raw) {
            Some(span) => serde_json::from_str(span),
            None => Err(whole),
        },
    }
}

/// First `{` through last `}`, when the closing brace comes after the opening one.
fn brace_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (start < end).then(|| &raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::Value as JsonValue;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Verdict {
        entity: String,
        verified: bool,
    }

    #[test]
    fn reply_without_brace_is_all_thinking() {
        let raw = "I could not find any entities in this text.";
        let split = split_reply(raw);
        assert_eq!(split.thinking, raw);
        assert_eq!(split.json_fragment, "");
        assert!(!split.has_fragment());
    }

    #[test]
    fn preamble_and_trailer_are_separated() {
        let raw = "<think>hmm</think>\n{\"entity\": \"Cairo\", \"verified\": true}\nDone.";
        let split = split_reply(raw);
        assert_eq!(split.thinking, "<think>hmm</think>\n");
        assert_eq!(
            split.json_fragment,
            "{\"entity\": \"Cairo\", \"verified\": true}"
        );
    }

    #[test]
    fn closing_brace_before_opening_yields_no_fragment() {
        let raw = "} stray { open";
        let split = split_reply(raw);
        assert_eq!(split.thinking, "} stray ");
        assert_eq!(split.json_fragment, "");
    }

    #[test]
    fn opening_brace_without_close_keeps_preamble() {
        let split = split_reply("thinking... {\"persons\": [");
        assert_eq!(split.thinking, "thinking... ");
        assert!(!split.has_fragment());
    }

    #[test]
    fn multibyte_preamble_is_sliced_on_char_boundaries() {
        let raw = "دعني أفكر {\"entity\": \"القاهرة\", \"verified\": true}";
        let split = split_reply(raw);
        assert_eq!(split.thinking, "دعني أفكر ");
        let verdict: Verdict = decode_fragment(&split.json_fragment).expect("decode");
        assert_eq!(verdict.entity, "القاهرة");
        assert!(verdict.verified);
    }

    #[test]
    fn empty_fragment_fails_to_decode() {
        assert!(decode_fragment::<JsonValue>("").is_err());
    }

    #[test]
    fn tolerant_decode_prefers_whole_string() {
        let values: Vec<u32> = decode_tolerant("[1, 2, 3]").expect("whole string decodes");
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn tolerant_decode_falls_back_to_brace_span() {
        let raw = "Sure! Here you go:\n```json\n{\"entity\": \"Berlin\", \"verified\": false}\n```";
        let verdict: Verdict = decode_tolerant(raw).expect("span decodes");
        assert_eq!(
            verdict,
            Verdict {
                entity: "Berlin".to_string(),
                verified: false,
            }
        );
    }

    #[test]
    fn tolerant_decode_without_span_reports_error() {
        assert!(decode_tolerant::<JsonValue>("no json here").is_err());
    }

    // Known boundary: the span is greedy, so two top-level objects are merged
    // into one decode attempt instead of being picked apart.
    #[test]
    fn two_top_level_objects_merge_into_one_failed_span() {
        let raw = "first {\"a\": 1} then {\"b\": 2} end";
        let split = split_reply(raw);
        assert_eq!(split.json_fragment, "{\"a\": 1} then {\"b\": 2}");
        assert!(decode_fragment::<JsonValue>(&split.json_fragment).is_err());
        assert!(decode_tolerant::<JsonValue>(raw).is_err());
    }

    #[test]
    fn nested_objects_stay_inside_the_span() {
        let raw = "x {\"outer\": {\"inner\": {\"deep\": true}}} y";
        let value: JsonValue = decode_tolerant(raw).expect("decode");
        assert_eq!(value["outer"]["inner"]["deep"], JsonValue::Bool(true));
    }
}
