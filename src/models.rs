use serde::{Deserialize, Serialize, Serializer};

/// Scale value reserved for a failed classification.
pub const FAILED_SCALE: i64 = -1;

/// Brief written alongside [`FAILED_SCALE`].
pub const FAILED_BRIEF: &str = "OutputParserException";

/// Lowest scale counted as "likely OT/ICS" in reports.
pub const LIKELY_THRESHOLD: i64 = 3;

/// One product read from the input table. Columns other than `caption` and
/// `vendor` are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SoftwareRecord {
    pub caption: String,
    pub vendor: String,
}

/// The `scale` value exactly as the model sent it.
///
/// JSON integers are kept as numbers; every other value (a quoted `"4"`,
/// `"high"`, `4.5`) is kept as its text and written out unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Scale {
    Score(i64),
    Other(String),
}

impl Scale {
    /// Integer reading used for report buckets only; the stored value is
    /// never rewritten.
    pub fn as_score(&self) -> Option<i64> {
        match self {
            Scale::Score(n) => Some(*n),
            Scale::Other(s) => s.trim().parse().ok(),
        }
    }
}

impl std::fmt::Display for Scale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scale::Score(n) => write!(f, "{}", n),
            Scale::Other(s) => write!(f, "{}", s),
        }
    }
}

impl Serialize for Scale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scale::Score(n) => serializer.serialize_i64(*n),
            Scale::Other(s) => serializer.serialize_str(s),
        }
    }
}

/// Result of classifying a single product.
///
/// Built only by the response parser or as the failure sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    scale: Scale,
    brief: String,
}

impl ClassificationResult {
    pub(crate) fn new(scale: Scale, brief: String) -> Self {
        Self { scale, brief }
    }

    /// The in-band failure marker `{scale: -1, brief: "OutputParserException"}`.
    pub fn failed() -> Self {
        Self::new(Scale::Score(FAILED_SCALE), FAILED_BRIEF.to_string())
    }

    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    pub fn brief(&self) -> &str {
        &self.brief
    }

    pub fn is_failed(&self) -> bool {
        is_sentinel(&self.scale, &self.brief)
    }

    pub fn into_parts(self) -> (Scale, String) {
        (self.scale, self.brief)
    }
}

/// An output row. Field order is the output column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedRecord {
    pub scale: Scale,
    pub caption: String,
    pub vendor: String,
    pub brief: String,
}

impl ClassifiedRecord {
    pub fn new(record: SoftwareRecord, result: ClassificationResult) -> Self {
        let (scale, brief) = result.into_parts();
        Self {
            scale,
            caption: record.caption,
            vendor: record.vendor,
            brief,
        }
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::of(&self.scale, &self.brief)
    }
}

/// Report bucket for a classified row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Integer scale at or above [`LIKELY_THRESHOLD`].
    Likely,
    /// Integer scale from 0 up to the threshold.
    Unlikely,
    /// The model answered, but not with a non-negative integer.
    Unscored,
    /// The failure sentinel.
    Failed,
}

impl Verdict {
    /// A row is `Failed` only when both sentinel values are present, so a
    /// model that itself answers `-1` with a real brief lands in `Unscored`.
    pub fn of(scale: &Scale, brief: &str) -> Self {
        if is_sentinel(scale, brief) {
            return Verdict::Failed;
        }
        match scale.as_score() {
            Some(n) if n >= LIKELY_THRESHOLD => Verdict::Likely,
            Some(n) if n >= 0 => Verdict::Unlikely,
            _ => Verdict::Unscored,
        }
    }
}

fn is_sentinel(scale: &Scale, brief: &str) -> bool {
    *scale == Scale::Score(FAILED_SCALE) && brief == FAILED_BRIEF
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_sentinel() {
        let failed = ClassificationResult::failed();
        assert_eq!(failed.scale(), &Scale::Score(-1));
        assert_eq!(failed.brief(), "OutputParserException");
        assert!(failed.is_failed());
        assert_eq!(Verdict::of(failed.scale(), failed.brief()), Verdict::Failed);
    }

    #[test]
    fn test_model_supplied_minus_one_is_not_failed() {
        let result = ClassificationResult::new(Scale::Score(-1), "PLC firmware loader".to_string());
        assert!(!result.is_failed());
        assert_eq!(Verdict::of(result.scale(), result.brief()), Verdict::Unscored);
    }

    #[test]
    fn test_verdict_buckets() {
        let of = |scale: Scale| Verdict::of(&scale, "x");
        assert_eq!(of(Scale::Score(0)), Verdict::Unlikely);
        assert_eq!(of(Scale::Score(2)), Verdict::Unlikely);
        assert_eq!(of(Scale::Score(3)), Verdict::Likely);
        // out-of-range scores are passed through, not clamped
        assert_eq!(of(Scale::Score(7)), Verdict::Likely);
        assert_eq!(of(Scale::Other("4".to_string())), Verdict::Likely);
        assert_eq!(of(Scale::Other("high".to_string())), Verdict::Unscored);
        assert_eq!(of(Scale::Other("4.5".to_string())), Verdict::Unscored);
    }

    #[test]
    fn test_scale_serializes_as_sent() {
        assert_eq!(serde_json::to_string(&Scale::Score(5)).unwrap(), "5");
        assert_eq!(
            serde_json::to_string(&Scale::Other("high".to_string())).unwrap(),
            "\"high\""
        );
        assert_eq!(Scale::Other("4.5".to_string()).to_string(), "4.5");
    }

    #[test]
    fn test_classified_record_fields() {
        let row = ClassifiedRecord::new(
            SoftwareRecord {
                caption: "WinCC".to_string(),
                vendor: "Siemens".to_string(),
            },
            ClassificationResult::new(Scale::Score(5), "SCADA HMI".to_string()),
        );
        assert_eq!(row.scale, Scale::Score(5));
        assert_eq!(row.caption, "WinCC");
        assert_eq!(row.vendor, "Siemens");
        assert_eq!(row.brief, "SCADA HMI");
        assert_eq!(row.verdict(), Verdict::Likely);
    }
}
