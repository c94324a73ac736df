use crate::error::ConfigurationError;
use crate::scenario::DataTypeFamily;
use serde::{Deserialize, Serialize};

/// Tag selecting one container implementation.
///
/// [ContainerKind::Null] is the baseline marker and is valid for every family. It selects a
/// trivial substitute container so that the measured cost approximates the fixed overhead of the
/// workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContainerKind {
    Null,
    /// `Vec<T>`
    StdVec,
    /// `SmallVec<[T; 16]>`
    SmallVec16,
    /// `SmallVec<[T; 64]>`
    SmallVec64,
    /// `String`
    StdString,
    /// Small-buffer string with 24 inline bytes.
    InlineString24,
    /// Small-buffer string with 64 inline bytes.
    InlineString64,
}

impl ContainerKind {
    /// The family this kind belongs to, or `None` for the null marker which fits all of them.
    pub fn family(&self) -> Option<DataTypeFamily> {
        match self {
            ContainerKind::Null => None,
            ContainerKind::StdVec | ContainerKind::SmallVec16 | ContainerKind::SmallVec64 => {
                Some(DataTypeFamily::Sequence)
            }
            ContainerKind::StdString
            | ContainerKind::InlineString24
            | ContainerKind::InlineString64 => Some(DataTypeFamily::Text),
        }
    }

    pub fn fits(&self, family: DataTypeFamily) -> bool {
        self.family().map_or(true, |f| f == family)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateRole {
    /// Names the scenario and measures fixed overhead. Never reported as a row.
    Baseline,
    /// A well known implementation that others are compared against, usually the standard one.
    Reference,
    /// An implementation under evaluation.
    Subject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    label: Option<String>,
    kind: ContainerKind,
    role: CandidateRole,
}

impl Candidate {
    pub fn baseline() -> Self {
        Self {
            label: None,
            kind: ContainerKind::Null,
            role: CandidateRole::Baseline,
        }
    }

    pub fn reference(label: impl Into<String>, kind: ContainerKind) -> Self {
        Self {
            label: Some(label.into()),
            kind,
            role: CandidateRole::Reference,
        }
    }

    pub fn subject(label: impl Into<String>, kind: ContainerKind) -> Self {
        Self {
            label: Some(label.into()),
            kind,
            role: CandidateRole::Subject,
        }
    }

    /// The report label, `None` for the baseline.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The label used in logs and diagnostics.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or("<baseline>")
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn role(&self) -> CandidateRole {
        self.role
    }

    pub fn is_baseline(&self) -> bool {
        self.role == CandidateRole::Baseline
    }
}

/// The ordered candidates measured for one [DataTypeFamily].
///
/// The baseline-null candidate is always present and always first. Every other candidate is
/// measured in insertion order, which is also the order of rows in each report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    family: DataTypeFamily,
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    pub fn new(family: DataTypeFamily) -> Self {
        Self {
            family,
            candidates: vec![Candidate::baseline()],
        }
    }

    pub fn with_reference(
        self,
        label: impl Into<String>,
        kind: ContainerKind,
    ) -> Result<Self, ConfigurationError> {
        self.with_candidate(Candidate::reference(label, kind))
    }

    pub fn with_subject(
        self,
        label: impl Into<String>,
        kind: ContainerKind,
    ) -> Result<Self, ConfigurationError> {
        self.with_candidate(Candidate::subject(label, kind))
    }

    fn with_candidate(mut self, candidate: Candidate) -> Result<Self, ConfigurationError> {
        let label = candidate.display_label().to_string();
        if label.trim().is_empty() {
            return Err(ConfigurationError::EmptyLabel(self.family));
        }
        if candidate.kind() == ContainerKind::Null {
            return Err(ConfigurationError::NullCandidate { label });
        }
        if !candidate.kind().fits(self.family) {
            return Err(ConfigurationError::FamilyMismatch {
                label,
                kind: candidate.kind(),
                family: self.family,
            });
        }
        if self.measured().any(|c| c.label() == Some(label.as_str())) {
            return Err(ConfigurationError::DuplicateLabel {
                label,
                family: self.family,
            });
        }

        self.candidates.push(candidate);
        Ok(self)
    }

    /// Check that there is something to compare: at least one reference and one subject.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.measured().any(|c| c.role() == CandidateRole::Reference) {
            return Err(ConfigurationError::MissingReference(self.family));
        }
        if !self.measured().any(|c| c.role() == CandidateRole::Subject) {
            return Err(ConfigurationError::MissingSubject(self.family));
        }
        Ok(())
    }

    pub fn family(&self) -> DataTypeFamily {
        self.family
    }

    pub fn baseline(&self) -> &Candidate {
        &self.candidates[0]
    }

    /// Every candidate except the baseline, in insertion order.
    pub fn measured(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter().skip(1)
    }

    pub fn labels(&self) -> Vec<String> {
        self.measured()
            .map(|c| c.display_label().to_string())
            .collect()
    }
}
