use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Displayed length cap for a single thread unit. Informational only.
pub const MAX_UNIT_CHARS: usize = 280;

/// Number of units requested from the provider for a thread.
pub const THREAD_UNITS: usize = 5;

/// Shown in place of generated content when the provider call fails.
pub const GENERATION_FAILED_MESSAGE: &str = "An error occurred while generating content.";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformFormat {
    #[default]
    Thread,
    PhotoCaption,
    ProfessionalPost,
}

impl PlatformFormat {
    pub const ALL: [PlatformFormat; 3] = [
        PlatformFormat::Thread,
        PlatformFormat::PhotoCaption,
        PlatformFormat::ProfessionalPost,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PlatformFormat::Thread => "Twitter Thread",
            PlatformFormat::PhotoCaption => "Instagram Caption",
            PlatformFormat::ProfessionalPost => "LinkedIn Post",
        }
    }

    /// Platform noun used when composing the provider instruction.
    pub fn platform(self) -> &'static str {
        match self {
            PlatformFormat::Thread => "twitter",
            PlatformFormat::PhotoCaption => "instagram",
            PlatformFormat::ProfessionalPost => "linkedin",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PlatformFormat::Thread => "thread",
            PlatformFormat::PhotoCaption => "photo-caption",
            PlatformFormat::ProfessionalPost => "professional-post",
        }
    }

    pub fn accepts_image(self) -> bool {
        self == PlatformFormat::PhotoCaption
    }

    pub fn next(self) -> Self {
        match self {
            PlatformFormat::Thread => PlatformFormat::PhotoCaption,
            PlatformFormat::PhotoCaption => PlatformFormat::ProfessionalPost,
            PlatformFormat::ProfessionalPost => PlatformFormat::Thread,
        }
    }
}

impl std::fmt::Display for PlatformFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image bytes attached to a photo-caption request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageAttachment {
    /// Read an image from disk, guessing the MIME type from its extension.
    pub fn from_path(path: &std::path::Path) -> anyhow::Result<Self> {
        use anyhow::Context;
        let bytes = std::fs::read(path).with_context(|| format!("read image {}", path.display()))?;
        let mime_type = mime_guess::from_path(path)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();
        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }
}

/// What the user has typed and picked so far. Owned by one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub format: PlatformFormat,
    pub prompt: String,
    pub image: Option<ImageAttachment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub format: PlatformFormat,
    pub prompt: String,
    pub image: Option<ImageAttachment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub units: Vec<String>,
}

impl GenerationResult {
    /// Single-unit placeholder shown after a failed provider call.
    pub fn failure() -> Self {
        Self {
            units: vec![GENERATION_FAILED_MESSAGE.to_string()],
        }
    }

    /// Units joined back with a blank-line separator, as stored in history.
    pub fn content_text(&self) -> String {
        self.units.join("\n\n")
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    pub owner_id: String,
    pub format: PlatformFormat,
    pub prompt: String,
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl HistoryRecord {
    pub fn created_at_display(&self) -> String {
        self.created_at
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "-".into())
    }
}

/// Workflow phases of a single submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowPhase {
    Idle,
    Validating,
    Requesting,
    Normalizing,
    Persisting,
    Displaying,
    ErrorDisplayed,
}

impl WorkflowPhase {
    /// Phases during which a new submission must be refused.
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            WorkflowPhase::Validating
                | WorkflowPhase::Requesting
                | WorkflowPhase::Normalizing
                | WorkflowPhase::Persisting
        )
    }
}

/// Events emitted by the workflow and consumed by presentation layers.
#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    PhaseChanged(WorkflowPhase),
    ValidationFailed(String),
    ProviderUnavailable(String),
    GenerationFailed {
        format: PlatformFormat,
        message: String,
    },
    Generated {
        format: PlatformFormat,
        result: GenerationResult,
    },
    Saved(HistoryRecord),
    SaveFailed(String),
    HistoryLoaded(Vec<HistoryRecord>),
    SignedIn(String),
    SignedOut,
    Info(String),
    Finished,
}

/// Final state of one submission, ready for text/JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub format: PlatformFormat,
    pub prompt: String,
    pub phase: WorkflowPhase,
    pub result: Option<GenerationResult>,
    pub record: Option<HistoryRecord>,
    pub error: Option<String>,
    pub save_error: Option<String>,
}

impl SubmissionOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}
