//! Typed questionnaire answers.
//!
//! Raw answers arrive as YAML answer files, CLI switches, interactive prompts,
//! or HTML-style form maps. They are converted into [`QuestionnaireAnswers`]
//! once, at the boundary, and only the typed record reaches the scoring engine.
//!
//! Every flag is an `Option<bool>`. A missing answer reads as `false`, which is
//! always the conservative choice: for maturity it drops the score, and for
//! impact it can only drop the score through the access control flag.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Security practices the maturity score is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityFlag {
    /// Holds an ISO-27001 certificate (the certification flag)
    HasIso27001,
    PerformsVulnerabilityScan,
    UsesMfa,
    UsesAutomatedAccessControl,
    MaintainsIncidentResponsePlan,
    UsesSso,
    IndividualAccounts,
}

impl MaturityFlag {
    pub const ALL: [MaturityFlag; 7] = [
        MaturityFlag::HasIso27001,
        MaturityFlag::PerformsVulnerabilityScan,
        MaturityFlag::UsesMfa,
        MaturityFlag::UsesAutomatedAccessControl,
        MaturityFlag::MaintainsIncidentResponsePlan,
        MaturityFlag::UsesSso,
        MaturityFlag::IndividualAccounts,
    ];

    /// Snake case name used in config and answer files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::HasIso27001 => "has_iso27001",
            Self::PerformsVulnerabilityScan => "performs_vulnerability_scan",
            Self::UsesMfa => "uses_mfa",
            Self::UsesAutomatedAccessControl => "uses_automated_access_control",
            Self::MaintainsIncidentResponsePlan => "maintains_incident_response_plan",
            Self::UsesSso => "uses_sso",
            Self::IndividualAccounts => "individual_accounts",
        }
    }

    /// Field name used by the web questionnaire form.
    pub fn form_name(&self) -> &'static str {
        match self {
            Self::HasIso27001 => "hasISO27001",
            Self::PerformsVulnerabilityScan => "performsVulnerabilityScan",
            Self::UsesMfa => "usesMFA",
            Self::UsesAutomatedAccessControl => "usesAutomatedAccessControl",
            Self::MaintainsIncidentResponsePlan => "maintainsIncidentResponsePlan",
            Self::UsesSso => "usesSSO",
            Self::IndividualAccounts => "individualAccounts",
        }
    }

    /// Question shown to the person filling in the questionnaire.
    pub fn question(&self) -> &'static str {
        match self {
            Self::HasIso27001 => "Does the vendor hold a current ISO-27001 certificate?",
            Self::PerformsVulnerabilityScan => "Does the vendor perform regular vulnerability scans?",
            Self::UsesMfa => "Does the vendor enforce multi-factor authentication?",
            Self::UsesAutomatedAccessControl => {
                "Does the vendor use automated access provisioning and revocation?"
            }
            Self::MaintainsIncidentResponsePlan => {
                "Does the vendor maintain a tested incident response plan?"
            }
            Self::UsesSso => "Does the vendor support single sign-on?",
            Self::IndividualAccounts => "Does every vendor user have an individual account?",
        }
    }
}

impl fmt::Display for MaturityFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for MaturityFlag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.name() == s || flag.form_name() == s)
            .ok_or_else(|| anyhow!("Unknown maturity flag '{}'", s))
    }
}

/// Exposure categories the impact score is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactFlag {
    /// Vendor needs access to operational data or internal systems
    RequireOperationData,
    RequireFinancialData,
    RequirePersonalData,
    CanCauseBusinessOutage,
    /// Access is restricted by role (a control; its absence adds exposure)
    RoleBasedAccess,
}

impl ImpactFlag {
    pub const ALL: [ImpactFlag; 5] = [
        ImpactFlag::RequireOperationData,
        ImpactFlag::RequireFinancialData,
        ImpactFlag::RequirePersonalData,
        ImpactFlag::CanCauseBusinessOutage,
        ImpactFlag::RoleBasedAccess,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::RequireOperationData => "require_operation_data",
            Self::RequireFinancialData => "require_financial_data",
            Self::RequirePersonalData => "require_personal_data",
            Self::CanCauseBusinessOutage => "can_cause_business_outage",
            Self::RoleBasedAccess => "role_based_access",
        }
    }

    pub fn form_name(&self) -> &'static str {
        match self {
            Self::RequireOperationData => "requireOperationData",
            Self::RequireFinancialData => "requireFinancialData",
            Self::RequirePersonalData => "requirePersonalData",
            Self::CanCauseBusinessOutage => "canCauseBusinessOutage",
            Self::RoleBasedAccess => "roleBasedAccess",
        }
    }

    pub fn question(&self) -> &'static str {
        match self {
            Self::RequireOperationData => {
                "Does the vendor need access to operational data or internal systems?"
            }
            Self::RequireFinancialData => "Does the vendor need access to financial data?",
            Self::RequirePersonalData => "Does the vendor process personal data?",
            Self::CanCauseBusinessOutage => "Could a failure at the vendor cause a business outage?",
            Self::RoleBasedAccess => "Is the vendor's access restricted by role?",
        }
    }
}

impl fmt::Display for ImpactFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ImpactFlag {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.name() == s || flag.form_name() == s)
            .ok_or_else(|| anyhow!("Unknown impact flag '{}'", s))
    }
}

/// Answers to the security maturity section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaturityAnswers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_iso27001: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performs_vulnerability_scan: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_mfa: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_automated_access_control: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintains_incident_response_plan: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_sso: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub individual_accounts: Option<bool>,
}

impl MaturityAnswers {
    /// Every flag answered with the same value.
    pub fn all(value: bool) -> Self {
        let mut answers = Self::default();
        for flag in MaturityFlag::ALL {
            answers.set(flag, value);
        }
        answers
    }

    /// Raw answer, `None` when the question was not answered.
    pub fn answer(&self, flag: MaturityFlag) -> Option<bool> {
        match flag {
            MaturityFlag::HasIso27001 => self.has_iso27001,
            MaturityFlag::PerformsVulnerabilityScan => self.performs_vulnerability_scan,
            MaturityFlag::UsesMfa => self.uses_mfa,
            MaturityFlag::UsesAutomatedAccessControl => self.uses_automated_access_control,
            MaturityFlag::MaintainsIncidentResponsePlan => self.maintains_incident_response_plan,
            MaturityFlag::UsesSso => self.uses_sso,
            MaturityFlag::IndividualAccounts => self.individual_accounts,
        }
    }

    /// Effective answer: unanswered reads as `false`.
    pub fn get(&self, flag: MaturityFlag) -> bool {
        self.answer(flag).unwrap_or(false)
    }

    pub fn set(&mut self, flag: MaturityFlag, value: bool) {
        let slot = match flag {
            MaturityFlag::HasIso27001 => &mut self.has_iso27001,
            MaturityFlag::PerformsVulnerabilityScan => &mut self.performs_vulnerability_scan,
            MaturityFlag::UsesMfa => &mut self.uses_mfa,
            MaturityFlag::UsesAutomatedAccessControl => &mut self.uses_automated_access_control,
            MaturityFlag::MaintainsIncidentResponsePlan => {
                &mut self.maintains_incident_response_plan
            }
            MaturityFlag::UsesSso => &mut self.uses_sso,
            MaturityFlag::IndividualAccounts => &mut self.individual_accounts,
        };
        *slot = Some(value);
    }
}

/// Answers to the impact section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImpactAnswers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_operation_data: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_financial_data: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_personal_data: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_cause_business_outage: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_based_access: Option<bool>,
}

impl ImpactAnswers {
    pub fn all(value: bool) -> Self {
        let mut answers = Self::default();
        for flag in ImpactFlag::ALL {
            answers.set(flag, value);
        }
        answers
    }

    pub fn answer(&self, flag: ImpactFlag) -> Option<bool> {
        match flag {
            ImpactFlag::RequireOperationData => self.require_operation_data,
            ImpactFlag::RequireFinancialData => self.require_financial_data,
            ImpactFlag::RequirePersonalData => self.require_personal_data,
            ImpactFlag::CanCauseBusinessOutage => self.can_cause_business_outage,
            ImpactFlag::RoleBasedAccess => self.role_based_access,
        }
    }

    pub fn get(&self, flag: ImpactFlag) -> bool {
        self.answer(flag).unwrap_or(false)
    }

    pub fn set(&mut self, flag: ImpactFlag, value: bool) {
        let slot = match flag {
            ImpactFlag::RequireOperationData => &mut self.require_operation_data,
            ImpactFlag::RequireFinancialData => &mut self.require_financial_data,
            ImpactFlag::RequirePersonalData => &mut self.require_personal_data,
            ImpactFlag::CanCauseBusinessOutage => &mut self.can_cause_business_outage,
            ImpactFlag::RoleBasedAccess => &mut self.role_based_access,
        };
        *slot = Some(value);
    }
}

/// Complete set of boolean answers for one questionnaire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestionnaireAnswers {
    #[serde(default)]
    pub maturity: MaturityAnswers,
    #[serde(default)]
    pub impact: ImpactAnswers,
}

impl QuestionnaireAnswers {
    /// Load answers from a YAML file with `maturity:` and `impact:` sections.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read answers from {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse answers in {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).context("Invalid questionnaire answers")
    }

    /// Build answers from a list of flag names that were answered "yes".
    ///
    /// Names may be given in snake case or in the form's camel case. Flags
    /// not mentioned stay unanswered.
    pub fn from_yes_flags<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        let mut answers = Self::default();
        for name in names {
            answers.set_named(name.as_ref(), true)?;
        }
        Ok(answers)
    }

    /// Build answers from a submitted form. Only the literal value `"true"`
    /// counts as yes; every other value, and every absent field, is no.
    pub fn from_form(form: &HashMap<String, String>) -> Self {
        let mut answers = Self::default();
        for flag in MaturityFlag::ALL {
            if let Some(value) = form.get(flag.form_name()) {
                answers.maturity.set(flag, value == "true");
            }
        }
        for flag in ImpactFlag::ALL {
            if let Some(value) = form.get(flag.form_name()) {
                answers.impact.set(flag, value == "true");
            }
        }
        answers
    }

    /// Set a flag by name, looking in both sections.
    pub fn set_named(&mut self, name: &str, value: bool) -> Result<()> {
        if let Ok(flag) = name.parse::<MaturityFlag>() {
            self.maturity.set(flag, value);
            return Ok(());
        }
        if let Ok(flag) = name.parse::<ImpactFlag>() {
            self.impact.set(flag, value);
            return Ok(());
        }
        anyhow::bail!("Unknown questionnaire flag '{}'", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_answers_read_as_false() {
        let answers = MaturityAnswers::default();
        for flag in MaturityFlag::ALL {
            assert_eq!(answers.answer(flag), None);
            assert!(!answers.get(flag));
        }
    }

    #[test]
    fn test_all_sets_every_flag() {
        let answers = ImpactAnswers::all(true);
        for flag in ImpactFlag::ALL {
            assert_eq!(answers.answer(flag), Some(true));
        }
    }

    #[test]
    fn test_flag_names_match_serde() {
        for flag in MaturityFlag::ALL {
            let yaml = serde_yaml::to_string(&flag).unwrap();
            assert_eq!(yaml.trim(), flag.name());
        }
        for flag in ImpactFlag::ALL {
            let yaml = serde_yaml::to_string(&flag).unwrap();
            assert_eq!(yaml.trim(), flag.name());
        }
    }

    #[test]
    fn test_flag_from_str_accepts_form_names() {
        assert_eq!(
            "hasISO27001".parse::<MaturityFlag>().unwrap(),
            MaturityFlag::HasIso27001
        );
        assert_eq!(
            "uses_mfa".parse::<MaturityFlag>().unwrap(),
            MaturityFlag::UsesMfa
        );
        assert_eq!(
            "roleBasedAccess".parse::<ImpactFlag>().unwrap(),
            ImpactFlag::RoleBasedAccess
        );
        assert!("uses_mfa".parse::<ImpactFlag>().is_err());
    }

    #[test]
    fn test_parse_yaml_answers() {
        let content = r#"
maturity:
  has_iso27001: true
  uses_mfa: false
impact:
  require_personal_data: true
"#;
        let answers = QuestionnaireAnswers::parse(content).unwrap();
        assert_eq!(answers.maturity.has_iso27001, Some(true));
        assert_eq!(answers.maturity.uses_mfa, Some(false));
        assert_eq!(answers.maturity.performs_vulnerability_scan, None);
        assert_eq!(answers.impact.require_personal_data, Some(true));
    }

    #[test]
    fn test_parse_rejects_unknown_flag() {
        let content = "maturity:\n  has_soc2: true\n";
        assert!(QuestionnaireAnswers::parse(content).is_err());
    }

    #[test]
    fn test_parse_empty_is_default() {
        let answers = QuestionnaireAnswers::parse("  \n").unwrap();
        assert_eq!(answers, QuestionnaireAnswers::default());
    }

    #[test]
    fn test_from_yes_flags() {
        let answers =
            QuestionnaireAnswers::from_yes_flags(&["has_iso27001", "requirePersonalData"]).unwrap();
        assert!(answers.maturity.get(MaturityFlag::HasIso27001));
        assert!(answers.impact.get(ImpactFlag::RequirePersonalData));
        assert_eq!(answers.maturity.uses_mfa, None);
    }

    #[test]
    fn test_from_yes_flags_unknown_name() {
        let err = QuestionnaireAnswers::from_yes_flags(&["has_soc2"]).unwrap_err();
        assert!(err.to_string().contains("Unknown questionnaire flag 'has_soc2'"));
    }

    #[test]
    fn test_from_form_only_true_literal_counts() {
        let mut form = HashMap::new();
        form.insert("hasISO27001".to_string(), "true".to_string());
        form.insert("usesMFA".to_string(), "on".to_string());
        form.insert("roleBasedAccess".to_string(), "TRUE".to_string());
        form.insert("companyName".to_string(), "Acme".to_string());

        let answers = QuestionnaireAnswers::from_form(&form);
        assert_eq!(answers.maturity.has_iso27001, Some(true));
        assert_eq!(answers.maturity.uses_mfa, Some(false));
        assert_eq!(answers.impact.role_based_access, Some(false));
        assert_eq!(answers.maturity.performs_vulnerability_scan, None);
    }
}
