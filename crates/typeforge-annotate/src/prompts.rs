//! Prompt construction
//!
//! Prompts are plain format strings. The type-inference prompt carries one
//! worked example so the model answers in the `identifier: type` shape the
//! hint parser expects.

/// Prompt asking the model to infer missing type hints for one function
///
/// `previous_error` is the checker output from the probe or the last failed
/// trial; it is the model's main clue and may be empty on a clean probe.
#[must_use]
pub fn type_prompt(function_text: &str, needs_typing: &[String], previous_error: &str) -> String {
    let needs_typing_text = needs_typing.join(",");
    format!(
        r#"
Please infer these missing Python type hints.
If you cannot determine the type with confidence, use 'any'.
The lowercase built-in types available include: int, str, list, set, dict, tuple.
You will be shown a previous error message from the type-checker with useful clues.

Input:
```
def foo(a, b: int, unk):
return a + b
```
Previous error:
```
error: Argument 3 to "foo" has incompatible type "LightBulb"; expected "NoReturn"  [arg-type]
```
Infer: a, unk, return
Output:
a: int
unk: LightBulb
return: int

Input:
```
{function_text}
```
Previous error:
```
{previous_error}
```
Infer: {needs_typing_text}
Output:
"#
    )
}

/// Prompt asking the model for a short docstring for one function
#[must_use]
pub fn doc_prompt(code: &str) -> String {
    format!(
        r#"
Write a short Python docstring for this code.
Do not include Arg lists.
Respond with docstring only, no code.
CODE:
{code}
"#
    )
}
