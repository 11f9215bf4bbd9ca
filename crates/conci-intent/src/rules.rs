//! Ordered keyword rule table.
//!
//! Precedence is data: rules are tried in table order and the first rule
//! with a phrase contained in the transcript wins. A transcript mentioning
//! both towels and food therefore resolves to towels, because the towel
//! rule sits earlier in the table. This is a single-intent classifier, not
//! a multi-intent resolver.

use conci_types::TvInput;

use crate::error::IntentError;
use crate::intent::Intent;

/// What a matched rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    /// Produce a fixed intent.
    Emit(Intent),
    /// Read the setpoint from "set thermostat to N"; defer when there is none.
    Thermostat,
}

/// A named set of trigger phrases and the action they fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    /// Lowercase substrings; any one of them triggers the rule.
    pub phrases: Vec<String>,
    pub action: RuleAction,
}

impl Rule {
    pub fn new(name: impl Into<String>, phrases: &[&str], action: RuleAction) -> Self {
        Self {
            name: name.into(),
            phrases: phrases.iter().map(|p| p.to_lowercase()).collect(),
            action,
        }
    }

    /// Whether any trigger phrase occurs in the (lowercased) transcript.
    pub fn matches(&self, transcript: &str) -> bool {
        self.phrases.iter().any(|p| transcript.contains(p.as_str()))
    }

    fn validate(&self) -> Result<(), IntentError> {
        if self.phrases.is_empty() {
            return Err(IntentError::EmptyRule(self.name.clone()));
        }
        if self.phrases.iter().any(|p| p.trim().is_empty()) {
            return Err(IntentError::EmptyPhrase(self.name.clone()));
        }
        Ok(())
    }
}

/// An ordered, validated list of rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Builds a table from rules in priority order.
    ///
    /// # Errors
    ///
    /// Rejects rules without phrases, empty phrases, and duplicate names.
    pub fn new(rules: Vec<Rule>) -> Result<Self, IntentError> {
        let mut table = Self { rules: Vec::new() };
        for rule in rules {
            table.push(rule)?;
        }
        Ok(table)
    }

    /// The built-in concierge rules.
    ///
    /// Device controls come first, then service categories in fixed
    /// priority, with emergencies last.
    pub fn standard() -> Self {
        let mut rules = vec![
            Rule::new(
                "lights_off",
                &["turn off the lights", "lights off"],
                RuleAction::Emit(Intent::Lights { on: false }),
            ),
            Rule::new(
                "lights_on",
                &["turn on the lights", "lights on"],
                RuleAction::Emit(Intent::Lights { on: true }),
            ),
            Rule::new(
                "blinds_open",
                &["open the blinds", "blinds up"],
                RuleAction::Emit(Intent::Blinds { open: true }),
            ),
            Rule::new(
                "blinds_close",
                &["close the blinds", "blinds down"],
                RuleAction::Emit(Intent::Blinds { open: false }),
            ),
            Rule::new(
                "thermostat",
                &["set thermostat to", "temperature"],
                RuleAction::Thermostat,
            ),
        ];

        for input in TvInput::ALL {
            let spoken = input.spoken();
            rules.push(Rule {
                name: format!("tv_{spoken}"),
                phrases: vec![format!("set tv to {spoken}"), format!("switch tv to {spoken}")],
                action: RuleAction::Emit(Intent::TvInput { input }),
            });
        }

        rules.extend([
            Rule::new("towels", &["towel", "tissue"], RuleAction::Emit(Intent::Towels)),
            Rule::new("toothbrush", &["toothbrush"], RuleAction::Emit(Intent::Toothbrush)),
            Rule::new("menu", &["menu"], RuleAction::Emit(Intent::Menu)),
            Rule::new("water", &["water", "thirsty"], RuleAction::Emit(Intent::Water)),
            Rule::new("luggage", &["luggage"], RuleAction::Emit(Intent::Luggage)),
            Rule::new(
                "maintenance",
                &["not working", "fix"],
                RuleAction::Emit(Intent::Maintenance),
            ),
            Rule::new("food", &["food", "order", "hungry"], RuleAction::Emit(Intent::Food)),
            Rule::new(
                "emergency",
                &["emergency", "help", "fire", "glass break", "co2", "smoke"],
                RuleAction::Emit(Intent::Emergency),
            ),
        ]);

        Self { rules }
    }

    /// Appends a rule at the lowest priority.
    pub fn push(&mut self, rule: Rule) -> Result<(), IntentError> {
        self.check_new(&rule)?;
        self.rules.push(rule);
        Ok(())
    }

    /// Inserts a rule immediately ahead of the rule called `before`.
    pub fn insert_before(&mut self, before: &str, rule: Rule) -> Result<(), IntentError> {
        self.check_new(&rule)?;
        let idx = self
            .position(before)
            .ok_or_else(|| IntentError::UnknownRule(before.to_string()))?;
        self.rules.insert(idx, rule);
        Ok(())
    }

    /// Index of the named rule in priority order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.name == name)
    }

    /// First rule that matches the lowercased transcript.
    pub fn first_match(&self, transcript: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.matches(transcript))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn check_new(&self, rule: &Rule) -> Result<(), IntentError> {
        rule.validate()?;
        if self.position(&rule.name).is_some() {
            return Err(IntentError::DuplicateRule(rule.name.clone()));
        }
        Ok(())
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::standard()
    }
}
