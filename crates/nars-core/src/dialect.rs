//! Per-backend sentence templates and execution-report extraction
//!
//! Every backend family speaks the same conceptual signals (perceive,
//! babble, register, goal, praise, punish) but differs in punctuation,
//! operator placement and truth-value annotation. A [`Dialect`] captures
//! those differences as data: a [`Templates`] record plus an extraction rule.
//!
//! Templates use `%s` as the placeholder. The sense template takes
//! `(subject, predicate)`; every other template takes one name.

use crate::error::{NarsError, Result};
use crate::operation::{OPERATOR_MARKER, Operation};
use crate::perception::Perception;
use std::borrow::Cow;
use std::fmt;
use tracing::warn;

/// Placeholder substituted by template arguments
pub const PLACEHOLDER: &str = "%s";

/// Sentence templates for one backend family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    /// `subject` has `predicate`, present tense
    pub sense: Cow<'static, str>,
    /// Self performed an operation. `None` if the backend rejects babble.
    pub babble: Option<Cow<'static, str>>,
    /// Desire that self has the named property
    pub goal: Cow<'static, str>,
    /// Desire that self does not have the named property
    pub negative_goal: Cow<'static, str>,
    /// Belief that the named goal holds
    pub praise: Cow<'static, str>,
    /// Belief that the named goal does not hold
    pub punish: Cow<'static, str>,
    /// Self is capable of an operation
    pub register: Cow<'static, str>,
    /// Execution report as printed by the backend
    pub report: Cow<'static, str>,
}

/// OpenNARS (Java)
pub const OPENNARS_TEMPLATES: Templates = Templates {
    sense: Cow::Borrowed("<{%s} --> [%s]>. :|:"),
    babble: Some(Cow::Borrowed("<(*,{SELF}) --> ^%s>. :|:")),
    goal: Cow::Borrowed("<{SELF} --> [%s]>! :|:"),
    negative_goal: Cow::Borrowed("(--, <{SELF} --> [%s]>)! :|:"),
    praise: Cow::Borrowed("<{SELF} --> [%s]>. :|:"),
    punish: Cow::Borrowed("<{SELF} --> [%s]>. :|: %0%"),
    register: Cow::Borrowed("<(*,{SELF}) --> ^%s>. :|:"),
    report: Cow::Borrowed("EXE: $0.50;0.50;0.50$ ^%s([{SELF}])=null"),
};

/// OpenNARS for Applications (C)
pub const ONA_TEMPLATES: Templates = Templates {
    sense: Cow::Borrowed("<{%s} --> [%s]>. :|:"),
    babble: None,
    goal: Cow::Borrowed("<{SELF} --> [%s]>! :|:"),
    negative_goal: Cow::Borrowed("(--, <{SELF} --> [%s]>)! :|:"),
    praise: Cow::Borrowed("<{SELF} --> [%s]>. :|:"),
    punish: Cow::Borrowed("<{SELF} --> [%s]>. :|: {0}"),
    register: Cow::Borrowed("(*,{SELF}, ^%s). :|:"),
    report: Cow::Borrowed("^%s executed with args"),
};

/// NARS-Python
pub const PYTHON_TEMPLATES: Templates = Templates {
    sense: Cow::Borrowed("({%s} --> [%s]). :|:"),
    babble: Some(Cow::Borrowed("((*, {SELF}) --> %s). :|:")),
    goal: Cow::Borrowed("({SELF} --> [%s])! :|:"),
    negative_goal: Cow::Borrowed("({SELF} --> (-, [%s]))! :|:"),
    praise: Cow::Borrowed("({SELF} --> [%s]). :|:"),
    punish: Cow::Borrowed("({SELF} --> [%s]). :|: %0.00;0.90%"),
    register: Cow::Borrowed("((*, {SELF}) --> %s). :|:"),
    report: Cow::Borrowed("EXE: ^%s based on desirability: 0.9"),
};

/// Pulls the canonical operation name out of an execution-report line
pub type ExtractFn = fn(&str) -> Option<&str>;

/// Protocol descriptor for one backend family
#[derive(Clone)]
pub struct Dialect {
    templates: Templates,
    extract: ExtractFn,
}

impl Dialect {
    /// Build a dialect, checking each template's placeholder count
    pub fn new(templates: Templates, extract: ExtractFn) -> Result<Self> {
        check_placeholders("sense", &templates.sense, 2)?;
        if let Some(babble) = &templates.babble {
            check_placeholders("babble", babble, 1)?;
        }
        check_placeholders("goal", &templates.goal, 1)?;
        check_placeholders("negative goal", &templates.negative_goal, 1)?;
        check_placeholders("praise", &templates.praise, 1)?;
        check_placeholders("punish", &templates.punish, 1)?;
        check_placeholders("register", &templates.register, 1)?;
        check_placeholders("report", &templates.report, 1)?;
        Ok(Self { templates, extract })
    }

    pub fn opennars() -> Self {
        Self {
            templates: OPENNARS_TEMPLATES,
            extract: extract_opennars,
        }
    }

    pub fn ona() -> Self {
        Self {
            templates: ONA_TEMPLATES,
            extract: extract_ona,
        }
    }

    pub fn python() -> Self {
        Self {
            templates: PYTHON_TEMPLATES,
            extract: extract_python,
        }
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    /// Whether the backend accepts unconscious-operation assertions
    pub fn supports_babble(&self) -> bool {
        self.templates.babble.is_some()
    }

    /// Encode a perception
    pub fn sense(&self, perception: &Perception) -> String {
        fill(
            &self.templates.sense,
            &[perception.subject(), perception.predicate()],
        )
    }

    /// Encode "self performed `operation`", if babble is supported
    pub fn babble(&self, operation: &Operation) -> Option<String> {
        self.templates
            .babble
            .as_deref()
            .map(|template| fill(template, &[operation.name()]))
    }

    /// Encode "self can perform `operation`"
    pub fn register(&self, operation: &Operation) -> String {
        fill(&self.templates.register, &[operation.name()])
    }

    /// Encode a goal, or its negation
    pub fn goal(&self, name: &str, negative: bool) -> String {
        let template = if negative {
            &self.templates.negative_goal
        } else {
            &self.templates.goal
        };
        fill(template, &[name])
    }

    /// Encode a reward for `name`
    pub fn praise(&self, name: &str) -> String {
        fill(&self.templates.praise, &[name])
    }

    /// Encode a punishment for `name`
    pub fn punish(&self, name: &str) -> String {
        fill(&self.templates.punish, &[name])
    }

    /// Render the line the backend prints when it executes `operation`
    pub fn execution_report(&self, operation: &Operation) -> String {
        fill(&self.templates.report, &[operation.name()])
    }

    /// Canonical operation name reported on `line`, if any
    pub fn extract<'a>(&self, line: &'a str) -> Option<&'a str> {
        (self.extract)(line)
    }
}

impl fmt::Debug for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialect")
            .field("templates", &self.templates)
            .finish_non_exhaustive()
    }
}

fn check_placeholders(template: &'static str, text: &str, expected: usize) -> Result<()> {
    let found = text.matches(PLACEHOLDER).count();
    if found != expected {
        return Err(NarsError::InvalidTemplate {
            template,
            expected,
            found,
        });
    }
    Ok(())
}

/// Substitute `args` into the placeholders of `template`, left to right
fn fill(template: &str, args: &[&str]) -> String {
    let extra: usize = args.iter().map(|a| a.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut parts = template.split(PLACEHOLDER);
    if let Some(head) = parts.next() {
        out.push_str(head);
    }
    for (i, part) in parts.enumerate() {
        if let Some(arg) = args.get(i) {
            out.push_str(arg);
        }
        out.push_str(part);
    }
    out
}

fn strip_marker(name: &str) -> &str {
    name.strip_prefix(OPERATOR_MARKER).unwrap_or(name)
}

/// `EXE: $0.27;0.90;0.93$ ^left([{SELF}])=null`
fn extract_opennars(line: &str) -> Option<&str> {
    if !line.starts_with("EXE") {
        return None;
    }
    let call = line.splitn(3, ' ').nth(2)?;
    let head = call.split('(').next()?;
    Some(strip_marker(head))
}

/// `^left executed with args`
fn extract_ona(line: &str) -> Option<&str> {
    if !line.starts_with(OPERATOR_MARKER) {
        return None;
    }
    let head = line.split(' ').next()?;
    Some(strip_marker(head))
}

/// `EXE: ^left based on desirability: 0.9`
fn extract_python(line: &str) -> Option<&str> {
    if line.to_lowercase().contains("reject") {
        warn!("Backend rejected input: {}", line);
    }
    if !line.contains("EXE") {
        return None;
    }
    let head = line.splitn(3, ' ').nth(1)?;
    Some(strip_marker(head))
}
