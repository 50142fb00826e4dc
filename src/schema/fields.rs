/// Key holding the 0–5 confidence score.
pub const SCALE_FIELD: &str = "scale";

/// Key holding the one-line capability description.
pub const BRIEF_FIELD: &str = "brief";

/// A named value the model is asked to produce.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseField {
    pub name: &'static str,
    pub description: &'static str,
}

/// Ordered set of fields expected in the model's reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    fields: Vec<ResponseField>,
}

impl ResponseSchema {
    pub fn new(fields: Vec<ResponseField>) -> Self {
        Self { fields }
    }

    /// The `scale` + `brief` schema used for OT/ICS classification.
    pub fn classification() -> Self {
        Self::new(vec![
            ResponseField {
                name: SCALE_FIELD,
                description:
                    "a confidence scale 0 to 5, higher scale means highly confident to be a OT/ICS software",
            },
            ResponseField {
                name: BRIEF_FIELD,
                description: "a brief description of the software capability in 1 line",
            },
        ])
    }

    pub fn fields(&self) -> &[ResponseField] {
        &self.fields
    }

    /// Formatting instructions for the prompt, one schema line per field in
    /// declaration order.
    pub fn describe(&self) -> String {
        let lines: Vec<String> = self
            .fields
            .iter()
            .map(|f| format!("\t\"{}\": string  // {}", f.name, f.description))
            .collect();

        format!(
            "The output should be a markdown code snippet formatted in the following schema, \
             including the leading and trailing \"```json\" and \"```\":\n\n\
             ```json\n{{\n{}\n}}\n```",
            lines.join("\n")
        )
    }
}
