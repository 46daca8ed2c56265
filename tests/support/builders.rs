use vendor_risk::questionnaire::{ImpactFlag, MaturityFlag, QuestionnaireAnswers};

/// Builds questionnaire answers flag by flag.
#[derive(Default)]
pub struct AnswersBuilder {
    answers: QuestionnaireAnswers,
}

impl AnswersBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every practice in place, no exposure, access restricted by role.
    pub fn best_case() -> Self {
        let mut builder = Self::new();
        for flag in MaturityFlag::ALL {
            builder = builder.maturity(flag, true);
        }
        for flag in ImpactFlag::ALL {
            builder = builder.impact(flag, false);
        }
        builder.impact(ImpactFlag::RoleBasedAccess, true)
    }

    pub fn maturity(mut self, flag: MaturityFlag, value: bool) -> Self {
        self.answers.maturity.set(flag, value);
        self
    }

    pub fn impact(mut self, flag: ImpactFlag, value: bool) -> Self {
        self.answers.impact.set(flag, value);
        self
    }

    pub fn build(self) -> QuestionnaireAnswers {
        self.answers
    }

    /// Render as an answers file accepted by `vendor-risk assess --answers`.
    pub fn to_yaml(&self) -> String {
        serde_yaml::to_string(&self.answers).expect("Failed to serialize answers")
    }
}
