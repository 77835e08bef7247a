use strum_macros::Display;

#[derive(Debug, Clone)]
pub struct ExportEvent {
    pub stage: Stage,
    pub progress: StageProgress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Stage {
    #[strum(to_string = "Loading File Names")]
    LoadingFileNames,
    #[strum(to_string = "Scanning Classes")]
    ScanningClasses,
    #[strum(to_string = "Resolving Signatures")]
    ResolvingSignatures,
    #[strum(to_string = "Writing Signatures")]
    WritingSignatures,
}

impl From<Stage> for ExportEvent {
    fn from(value: Stage) -> Self {
        ExportEvent {
            stage: value,
            progress: StageProgress::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StageProgress {
    Unknown,
    Percentage(f32),
    Done,
}
