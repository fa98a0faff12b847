use crate::model::{GenerationRequest, PlatformFormat, MAX_UNIT_CHARS, THREAD_UNITS};

/// Compose the instruction text sent to the provider.
pub fn compose_instruction(request: &GenerationRequest) -> String {
    let mut text = format!(
        "Generate {} content about \"{}\".",
        request.format.platform(),
        request.prompt
    );
    if request.format == PlatformFormat::Thread {
        text.push_str(&format!(
            " Provide a thread of {THREAD_UNITS} tweets, each under {MAX_UNIT_CHARS} characters."
        ));
    }
    if request.format.accepts_image() && request.image.is_some() {
        text.push_str(" Describe the image and incorporate it into the caption.");
    }
    text
}
