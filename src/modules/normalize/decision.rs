use crate::modules::normalize::model::PROFILE_IMAGE_TAG;

/// Which markers are already persisted on the object.
#[derive(Debug, Clone, Copy, Default)]
pub struct Markers {
    pub oriented: bool,
    pub cropped: bool,
}

/// Why an invocation ended without an upload. All of these are terminal
/// successes, not failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Key has no extension or one outside jpg/png.
    UnsupportedExtension,
    /// Both markers already present at download time.
    AlreadyProcessed,
    /// No EXIF orientation tag; nothing to normalize.
    NoOrientation,
    /// Crop branch reached but the object is not tagged `profile_image`.
    NotProfileImage,
    /// Crop marker already present; no further pass applies.
    NothingToApply,
}

/// The transform selected for this invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// First pass: apply auto-orient, persist `autoorient-timestamp`.
    Orient,
    /// Second pass: square crop/resize, rename key, persist
    /// `autocrop-timestamp`.
    CropSquare,
    /// No transform output; end the job successfully with no upload and
    /// no marker write.
    Skip(SkipReason),
}

/// Pure decision over the downloaded object's state. At most one transform
/// runs per invocation; once both markers exist every path is a skip.
pub fn decide(orientation_detected: bool, markers: Markers, tags: Option<&str>) -> Decision {
    if !orientation_detected {
        return Decision::Skip(SkipReason::NoOrientation);
    }

    if !markers.oriented && !markers.cropped {
        return Decision::Orient;
    }

    if !markers.cropped {
        let is_profile_image = tags.is_some_and(|t| t.contains(PROFILE_IMAGE_TAG));
        if is_profile_image {
            return Decision::CropSquare;
        }
        return Decision::Skip(SkipReason::NotProfileImage);
    }

    Decision::Skip(SkipReason::NothingToApply)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_orientation_skips_regardless_of_markers() {
        let decision = decide(false, Markers::default(), Some("profile_image"));
        assert_eq!(decision, Decision::Skip(SkipReason::NoOrientation));
    }

    #[test]
    fn fresh_object_gets_oriented() {
        assert_eq!(decide(true, Markers::default(), None), Decision::Orient);
        // Tags play no part in the first pass.
        assert_eq!(
            decide(true, Markers::default(), Some("profile_image")),
            Decision::Orient
        );
    }

    #[test]
    fn oriented_profile_image_gets_cropped() {
        let markers = Markers { oriented: true, cropped: false };
        assert_eq!(decide(true, markers, Some("profile_image")), Decision::CropSquare);
        assert_eq!(
            decide(true, markers, Some("avatar,profile_image")),
            Decision::CropSquare
        );
    }

    #[test]
    fn oriented_non_profile_image_skips() {
        let markers = Markers { oriented: true, cropped: false };
        assert_eq!(
            decide(true, markers, Some("banner")),
            Decision::Skip(SkipReason::NotProfileImage)
        );
        assert_eq!(
            decide(true, markers, None),
            Decision::Skip(SkipReason::NotProfileImage)
        );
    }

    #[test]
    fn cropped_object_has_nothing_left_to_apply() {
        let markers = Markers { oriented: true, cropped: true };
        assert_eq!(
            decide(true, markers, Some("profile_image")),
            Decision::Skip(SkipReason::NothingToApply)
        );
        // Crop marker without orient marker still falls through to skip.
        let markers = Markers { oriented: false, cropped: true };
        assert_eq!(
            decide(true, markers, Some("profile_image")),
            Decision::Skip(SkipReason::NothingToApply)
        );
    }
}
