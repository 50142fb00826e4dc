use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::ClassifyError;

/// `{name}` placeholders.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern compiles"));

/// Prompt asking the model to rate one product.
/// Placeholders: {caption}, {vendor}, {format_instructions}
pub const OT_CLASSIFICATION_TEMPLATE: &str = r#"You're an expert of operational technology (OT) and industrial control system (ICS), and fully comprehend those software that will be installed on HMI and SCADA.
Please tell me if the software {caption} (vendor {vendor}) is designed for OT/ICS along with a confidence scale 0 to 5, higher scale means highly confident to be a OT/ICS software.
In addition to the scale, please also provide a brief description of the software capability in 1 line. Please respond in the following format: {format_instructions}
"#;

/// A template with named `{placeholder}` slots.
///
/// Construction checks that the template uses exactly the declared
/// variables, and [`format`](Self::format) refuses to render until all of
/// them are bound, so no free placeholder ever reaches the model.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: &'static str,
    input_variables: Vec<&'static str>,
}

impl PromptTemplate {
    pub fn new(
        template: &'static str,
        input_variables: Vec<&'static str>,
    ) -> Result<Self, ClassifyError> {
        let used: BTreeSet<&str> = PLACEHOLDER
            .captures_iter(template)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .collect();
        let declared: BTreeSet<&str> = input_variables.iter().copied().collect();

        if used != declared {
            return Err(ClassifyError::Template(format!(
                "template placeholders {:?} do not match declared variables {:?}",
                used, declared
            )));
        }

        Ok(Self {
            template,
            input_variables,
        })
    }

    /// The OT/ICS classification prompt.
    pub fn ot_classification() -> Result<Self, ClassifyError> {
        Self::new(
            OT_CLASSIFICATION_TEMPLATE,
            vec!["caption", "vendor", "format_instructions"],
        )
    }

    /// Substitute every placeholder in a single pass. Bound values are
    /// inserted literally, so braces inside them are never re-expanded.
    pub fn format(&self, values: &HashMap<&str, &str>) -> Result<String, ClassifyError> {
        if let Some(missing) = self
            .input_variables
            .iter()
            .find(|v| !values.contains_key(*v))
        {
            return Err(ClassifyError::Template(format!(
                "no value bound for `{}`",
                missing
            )));
        }

        let rendered = PLACEHOLDER.replace_all(self.template, |caps: &Captures<'_>| {
            values
                .get(&caps[1])
                .map_or_else(|| caps[0].to_string(), |v| (*v).to_string())
        });

        Ok(rendered.into_owned())
    }
}
