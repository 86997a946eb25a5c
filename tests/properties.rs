//! Property tests for the scan-and-rewrite loop.

use proptest::prelude::*;
use resub::Utf8Engine;

proptest! {
    // A pattern that can match empty anywhere must still terminate, and the
    // rewrite can only grow the text.
    #[test]
    fn zero_length_global_substitution_terminates(input in "[a-c]{0,40}") {
        let mut engine = Utf8Engine::new();
        prop_assert!(engine.add_job(b"/x*/y/g").is_ok());

        let mut buffer = input.clone().into_bytes();
        let status = engine.replace_inplace(&mut buffer);
        prop_assert_eq!(status.code(), 0);
        prop_assert!(buffer.len() >= input.len());
    }

    // A job whose pattern matches nothing leaves the buffer untouched.
    #[test]
    fn non_matching_job_is_identity(input in "[a-z ]{0,60}") {
        let mut engine = Utf8Engine::new();
        prop_assert!(engine.add_job(b"/QQQ/x/g").is_ok());

        let mut buffer = input.clone().into_bytes();
        engine.replace_inplace(&mut buffer);
        prop_assert_eq!(buffer, input.into_bytes());
    }

    // Without the global flag at most one occurrence changes.
    #[test]
    fn first_match_only_substitutes_once(input in "[ab]{0,30}") {
        let mut engine = Utf8Engine::new();
        prop_assert!(engine.add_job(b"/a/X/").is_ok());

        let mut buffer = input.clone().into_bytes();
        engine.replace_inplace(&mut buffer);

        let replaced = buffer.iter().filter(|&&b| b == b'X').count();
        let expected = usize::from(input.contains('a'));
        prop_assert_eq!(replaced, expected);
    }

    // replace_copy and replace_inplace agree.
    #[test]
    fn copy_and_inplace_agree(input in "[a-d]{0,40}") {
        let mut engine = Utf8Engine::new();
        prop_assert!(engine.add_job(b"/ab/X/g").is_ok());

        let copied = engine.replace_copy(input.as_bytes());
        let mut buffer = input.into_bytes();
        engine.replace_inplace(&mut buffer);
        prop_assert_eq!(copied, buffer);
    }
}
