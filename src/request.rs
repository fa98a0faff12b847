//! Generation request builder.

use crate::error::ValidationError;
use crate::identity::CurrentUser;
use crate::model::{FormState, GenerationRequest};

/// Turn form state into a request for `user`. Returns the request and the owner id.
pub fn build_request(
    form: &FormState,
    user: &CurrentUser,
) -> Result<(GenerationRequest, String), ValidationError> {
    if form.prompt.trim().is_empty() {
        return Err(ValidationError::EmptyPrompt);
    }
    let owner_id = user
        .authenticated_id()
        .ok_or(ValidationError::NotSignedIn)?
        .to_string();

    // Attachments only travel with photo captions.
    let image = if form.format.accepts_image() {
        form.image.clone()
    } else {
        None
    };

    Ok((
        GenerationRequest {
            format: form.format,
            prompt: form.prompt.clone(),
            image,
        },
        owner_id,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageAttachment, PlatformFormat};

    fn image() -> ImageAttachment {
        ImageAttachment {
            file_name: "cat.png".into(),
            mime_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn non_empty_prompt_for_signed_in_user_builds() {
        let user = CurrentUser::signed_in("u1");
        for format in PlatformFormat::ALL {
            for prompt in ["coffee", "  spaced  ", "a\nb", "émoji ☕"] {
                let form = FormState {
                    format,
                    prompt: prompt.into(),
                    image: None,
                };
                let (req, owner) = build_request(&form, &user).unwrap();
                assert_eq!(req.format, format);
                assert_eq!(req.prompt, prompt);
                assert_eq!(owner, "u1");
            }
        }
    }

    #[test]
    fn empty_or_blank_prompt_is_rejected() {
        let user = CurrentUser::signed_in("u1");
        for prompt in ["", "   ", "\n\t"] {
            let form = FormState {
                prompt: prompt.into(),
                ..Default::default()
            };
            assert_eq!(
                build_request(&form, &user),
                Err(ValidationError::EmptyPrompt)
            );
        }
    }

    #[test]
    fn anonymous_user_is_rejected() {
        let form = FormState {
            prompt: "coffee".into(),
            ..Default::default()
        };
        assert_eq!(
            build_request(&form, &CurrentUser::anonymous()),
            Err(ValidationError::NotSignedIn)
        );
    }

    #[test]
    fn image_is_kept_only_for_photo_captions() {
        let user = CurrentUser::signed_in("u1");
        let mut form = FormState {
            format: PlatformFormat::PhotoCaption,
            prompt: "beach day".into(),
            image: Some(image()),
        };
        let (req, _) = build_request(&form, &user).unwrap();
        assert_eq!(req.image, Some(image()));

        form.format = PlatformFormat::Thread;
        let (req, _) = build_request(&form, &user).unwrap();
        assert_eq!(req.image, None);
    }
}
