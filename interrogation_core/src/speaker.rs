//! Speaker labels shared by the transcript, the prompt, and the sanitizer.

/// The detective asking the questions.
pub const ASKER_NAME: &str = "刑事";

/// The interrogated character.
pub const CHARACTER_NAME: &str = "シグレ";

/// Label that opens a detective line.
pub const ASKER_LABEL: &str = "刑事:";

/// Label that opens a character line.
pub const CHARACTER_LABEL: &str = "シグレ:";

/// Full-width colon variants the generator sometimes produces.
pub const ASKER_LABEL_WIDE: &str = "刑事：";
pub const CHARACTER_LABEL_WIDE: &str = "シグレ：";
