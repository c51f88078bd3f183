// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for selection validation

use video_switcher::errors::SelectionError;
use video_switcher::selection::{Branch, DeviceRef, Selection, validate};

fn writable(_: &DeviceRef) -> bool {
    true
}

fn read_only(_: &DeviceRef) -> bool {
    false
}

#[test]
fn test_distinct_writable_selection_is_valid() {
    let selection = Selection::new(
        Some("/dev/video0"),
        Some("/dev/video2"),
        Some("/dev/video10"),
    );
    let validated = validate(&selection, &writable).expect("selection should be valid");

    assert_eq!(validated.camera(Branch::A).as_str(), "/dev/video0");
    assert_eq!(validated.camera(Branch::B).as_str(), "/dev/video2");
    assert_eq!(validated.output().as_str(), "/dev/video10");
}

#[test]
fn test_any_missing_device_is_incomplete() {
    let cases = [
        Selection::new(None::<&str>, Some("/dev/video2"), Some("/dev/video10")),
        Selection::new(Some("/dev/video0"), None::<&str>, Some("/dev/video10")),
        Selection::new(Some("/dev/video0"), Some("/dev/video2"), None::<&str>),
        Selection::default(),
    ];

    for selection in &cases {
        assert_eq!(
            validate(selection, &writable).err(),
            Some(SelectionError::IncompleteSelection),
            "{:?}",
            selection
        );
    }
}

#[test]
fn test_output_equal_to_an_input_is_rejected() {
    let selection = Selection::new(
        Some("/dev/video0"),
        Some("/dev/video2"),
        Some("/dev/video0"),
    );
    assert_eq!(
        validate(&selection, &writable).err(),
        Some(SelectionError::OutputCollidesWithInput)
    );

    let selection = Selection::new(
        Some("/dev/video0"),
        Some("/dev/video2"),
        Some("/dev/video2"),
    );
    assert_eq!(
        validate(&selection, &writable).err(),
        Some(SelectionError::OutputCollidesWithInput)
    );
}

#[test]
fn test_duplicate_inputs_rejected() {
    let selection = Selection::new(
        Some("/dev/video0"),
        Some("/dev/video0"),
        Some("/dev/video10"),
    );
    assert_eq!(
        validate(&selection, &writable).err(),
        Some(SelectionError::DuplicateInputs)
    );
}

#[test]
fn test_collision_reported_before_duplicate() {
    // All three identical: both rules fail, collision wins
    let selection = Selection::new(
        Some("/dev/video0"),
        Some("/dev/video0"),
        Some("/dev/video0"),
    );
    assert_eq!(
        validate(&selection, &writable).err(),
        Some(SelectionError::OutputCollidesWithInput)
    );
}

#[test]
fn test_write_access_checked_last() {
    let selection = Selection::new(
        Some("/dev/video0"),
        Some("/dev/video0"),
        Some("/dev/video10"),
    );
    assert_eq!(
        validate(&selection, &read_only).err(),
        Some(SelectionError::DuplicateInputs)
    );

    let selection = Selection::new(
        Some("/dev/video0"),
        Some("/dev/video2"),
        Some("/dev/video10"),
    );
    assert_eq!(
        validate(&selection, &read_only).err(),
        Some(SelectionError::OutputNotWritable(DeviceRef::from("/dev/video10")))
    );
}

#[test]
fn test_access_probe_sees_only_output() {
    let only_video10 = |device: &DeviceRef| device.as_str() == "/dev/video10";
    let selection = Selection::new(
        Some("/dev/video0"),
        Some("/dev/video2"),
        Some("/dev/video10"),
    );
    assert!(validate(&selection, &only_video10).is_ok());
}

#[test]
fn test_error_messages_are_user_facing() {
    assert_eq!(
        SelectionError::IncompleteSelection.to_string(),
        "Please select two input cameras and one virtual output device."
    );
    assert_eq!(
        SelectionError::DuplicateInputs.to_string(),
        "Cam 1 and Cam 2 must be different devices."
    );
    let message = SelectionError::OutputNotWritable(DeviceRef::from("/dev/video10")).to_string();
    assert!(message.contains("/dev/video10"));
    assert!(message.contains("'video' group"));
}
