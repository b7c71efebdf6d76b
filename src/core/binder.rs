// src/core/binder.rs

//! Resolves a compiled template against validated operator tokens.

use crate::{
    core::input_parser::ValidationError,
    models::{BoundCommand, CompiledTemplate, TemplateSegment, UserSelection},
};

/// Builds the final argument vector for a selection.
///
/// `$N` takes token N verbatim, and `$*` expands into one argv entry per token after the
/// fixed ones. No token is ever split, quoted, or expanded again.
pub fn bind(
    template: &CompiledTemplate,
    selection: &UserSelection,
) -> Result<BoundCommand, ValidationError> {
    let tokens = &selection.raw_tokens;
    let fixed_count = template.required_count();

    // The validator already enforced this; re-checking keeps `bind` total.
    let short = tokens.len() < fixed_count;
    let overfull = !template.has_variadic() && tokens.len() > fixed_count;
    if short || overfull {
        return Err(ValidationError::ParameterCountMismatch {
            index: selection.entry_index,
            expected: fixed_count,
            variadic: template.has_variadic(),
            given: tokens.len(),
        });
    }

    let extra = tokens.get(fixed_count..).unwrap_or(&[]);
    let mut argv = Vec::with_capacity(template.tokens().len() + extra.len());

    for segments in template.tokens() {
        if segments.as_slice() == [TemplateSegment::Variadic] {
            argv.extend(extra.iter().cloned());
            continue;
        }

        let mut arg = String::new();
        for segment in segments {
            match segment {
                TemplateSegment::Literal(text) => arg.push_str(text),
                TemplateSegment::ParamRef(index) => {
                    let value = index
                        .checked_sub(1)
                        .and_then(|position| tokens.get(position))
                        .ok_or_else(|| ValidationError::ParameterCountMismatch {
                            index: selection.entry_index,
                            expected: fixed_count,
                            variadic: template.has_variadic(),
                            given: tokens.len(),
                        })?;
                    arg.push_str(value);
                }
                // The compiler never places the marker next to other segments.
                TemplateSegment::Variadic => argv.extend(extra.iter().cloned()),
            }
        }
        argv.push(arg);
    }

    log::debug!("Bound entry {} to argv {:?}", selection.entry_index, argv);
    Ok(BoundCommand::new(argv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compiler::compile_template;

    fn selection(tokens: &[&str]) -> UserSelection {
        UserSelection {
            entry_index: 1,
            raw_tokens: tokens.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn bind_str(command: &str, tokens: &[&str]) -> Vec<String> {
        let template = compile_template(command).unwrap();
        bind(&template, &selection(tokens)).unwrap().argv().to_vec()
    }

    #[test]
    fn test_single_parameter() {
        assert_eq!(bind_str(r#"/bin/echo "$1""#, &["hello"]), vec!["/bin/echo", "hello"]);
    }

    #[test]
    fn test_escaped_dollar() {
        assert_eq!(bind_str("/usr/bin/foo $$", &[]), vec!["/usr/bin/foo", "$"]);
    }

    #[test]
    fn test_variadic_expands_to_separate_entries() {
        assert_eq!(bind_str("/bin/cat $*", &["a", "b"]), vec!["/bin/cat", "a", "b"]);
        assert_eq!(bind_str("/bin/cat $*", &[]), vec!["/bin/cat"]);
    }

    #[test]
    fn test_parameter_inside_a_larger_token() {
        assert_eq!(
            bind_str("/usr/bin/tool --out=$1.txt $2", &["report", "x"]),
            vec!["/usr/bin/tool", "--out=report.txt", "x"]
        );
    }

    #[test]
    fn test_repeated_and_reordered_references() {
        assert_eq!(
            bind_str("/bin/echo $2 $1 $2", &["one", "two"]),
            vec!["/bin/echo", "two", "one", "two"]
        );
    }

    #[test]
    fn test_fixed_then_variadic_consumes_after_fixed() {
        assert_eq!(
            bind_str("/usr/bin/grep $1 $*", &["needle", "f1", "f2"]),
            vec!["/usr/bin/grep", "needle", "f1", "f2"]
        );
        // Position of the marker in the template does not change what it consumes.
        assert_eq!(
            bind_str("/usr/bin/cp $* $1", &["dest", "a", "b"]),
            vec!["/usr/bin/cp", "a", "b", "dest"]
        );
    }

    #[test]
    fn test_gap_token_is_required_but_dropped() {
        assert_eq!(
            bind_str("/bin/echo $1 $3", &["a", "b", "c"]),
            vec!["/bin/echo", "a", "c"]
        );
    }

    #[test]
    fn test_tokens_with_shell_metacharacters_pass_verbatim() {
        // Characters a shell would interpret arrive untouched as one argv entry each.
        let argv = bind_str("/bin/echo $1 $2", &["$HOME", "*.txt"]);
        assert_eq!(argv, vec!["/bin/echo", "$HOME", "*.txt"]);
    }

    #[test]
    fn test_bound_argv_reparses_to_same_tokens() {
        let tokens = ["it's", "quote\"d", "back\\slash", "~user", "$*"];
        let argv = bind_str("/bin/echo $*", &tokens);
        let reparsed = shlex::split(&BoundCommand::new(argv.clone()).display()).unwrap();
        assert_eq!(reparsed, argv);
        assert_eq!(&argv[1..], &tokens);
    }

    #[test]
    fn test_short_selection_is_refused() {
        let template = compile_template("/bin/echo $2").unwrap();
        let result = bind(&template, &selection(&["only-one"]));
        assert!(matches!(
            result,
            Err(ValidationError::ParameterCountMismatch { expected: 2, given: 1, .. })
        ));
    }
}
