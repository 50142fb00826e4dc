use std::collections::HashMap;

use tracing::{debug, info, warn};

use crate::error::ClassifyError;
use crate::llm::CompletionModel;
use crate::models::ClassificationResult;
use crate::prompt::PromptTemplate;
use crate::schema::ResponseSchema;

/// Stands in for `\` in model output before parsing.
pub const ESCAPE_PLACEHOLDER: &str = "$";

/// Rates one product at a time against a [`CompletionModel`].
///
/// Holds no mutable state: the same input and model reply always give the
/// same result.
pub struct Classifier<'a> {
    model: &'a dyn CompletionModel,
    schema: ResponseSchema,
    template: PromptTemplate,
}

impl<'a> Classifier<'a> {
    pub fn new(model: &'a dyn CompletionModel) -> Result<Self, ClassifyError> {
        Ok(Self {
            model,
            schema: ResponseSchema::classification(),
            template: PromptTemplate::ot_classification()?,
        })
    }

    /// Resolve the prompt for one product.
    pub fn prompt(&self, caption: &str, vendor: &str) -> Result<String, ClassifyError> {
        let format_instructions = self.schema.describe();
        let values = HashMap::from([
            ("caption", caption),
            ("vendor", vendor),
            ("format_instructions", format_instructions.as_str()),
        ]);
        self.template.format(&values)
    }

    /// Classify one product.
    ///
    /// An unparseable reply yields [`ClassificationResult::failed`] instead of
    /// an error; transport failures are returned to the caller.
    pub async fn classify(
        &self,
        caption: &str,
        vendor: &str,
    ) -> Result<ClassificationResult, ClassifyError> {
        let prompt = self.prompt(caption, vendor)?;
        debug!(%caption, %vendor, "final prompt:\n{}", prompt);

        let raw = self.model.complete(&prompt).await?;
        let output = sanitize(&raw);
        debug!(%caption, "model output:\n{}", output);

        match self.schema.parse(&output) {
            Ok(result) => {
                info!(%caption, %vendor, scale = %result.scale(), brief = %result.brief(), "classified");
                Ok(result)
            }
            Err(ClassifyError::MalformedResponse(reason)) => {
                warn!(%caption, %vendor, "{}", reason);
                Ok(ClassificationResult::failed())
            }
            Err(other) => Err(other),
        }
    }
}

/// Replace every backslash so stray escapes (Windows paths and the like)
/// cannot break JSON decoding.
pub fn sanitize(raw: &str) -> String {
    raw.replace('\\', ESCAPE_PLACEHOLDER)
}
