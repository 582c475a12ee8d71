use codeblocks::{extract, extract_from_str, CodeBlock};
use pretty_assertions::assert_eq;
use std::fs;

fn fixture(name: &str) -> Vec<CodeBlock> {
    let source = fs::read(format!("tests/markdown/{name}")).unwrap();
    extract(&source)
}

fn summary(blocks: &[CodeBlock]) -> Vec<(&str, &str)> {
    blocks
        .iter()
        .map(|block| (block.language(), block.content()))
        .collect()
}

#[test]
fn should_extract_single_block() {
    // Given / When
    let blocks = fixture("single_go.md");

    // Then
    assert_eq!(summary(&blocks), vec![("go", "package main\n")]);
}

#[test]
fn should_keep_document_order_and_line_endings() {
    // Given / When
    let blocks = fixture("three_languages.md");

    // Then
    assert_eq!(
        summary(&blocks),
        vec![
            ("go", "package main\n\nfunc main() {}\n"),
            ("python", "print(\"hello\")\n"),
            ("javascript", "console.log(\"hello\");\n"),
        ]
    );
}

#[test]
fn should_ignore_indented_code_and_inline_code() {
    // Given / When
    let blocks = fixture("no_blocks.md");

    // Then
    assert!(blocks.is_empty());
}

#[test]
fn should_skip_untagged_and_empty_fences() {
    // Given / When
    let blocks = fixture("untagged_and_empty.md");

    // Then
    assert_eq!(
        summary(&blocks),
        vec![("toml", "[package]\nname = \"kept\"\n")]
    );
}

#[test]
fn should_find_fences_inside_containers() {
    // Given / When
    let blocks = fixture("nested.md");

    // Then
    assert_eq!(
        summary(&blocks),
        vec![
            ("sh", "echo quoted\n"),
            ("yaml", "key: value\nother: 1\n"),
            ("Foobar", "mystery\n"),
        ]
    );
}

#[test]
fn should_keep_full_info_string_as_language() {
    // Given
    let markdown = "```rust ignore\nlet x = 1;\n```\n";

    // When
    let blocks = extract_from_str(markdown);

    // Then
    assert_eq!(summary(&blocks), vec![("rust ignore", "let x = 1;\n")]);
}

#[test]
fn should_close_unterminated_fence_at_end_of_document() {
    // Given
    let markdown = "```python\nprint(1)\n";

    // When
    let blocks = extract_from_str(markdown);

    // Then
    assert_eq!(summary(&blocks), vec![("python", "print(1)\n")]);
}

#[test]
fn should_tolerate_invalid_utf8() {
    // Given
    let mut source = b"```text\nbad \xff byte\n```\n".to_vec();
    source.extend_from_slice(b"```go\npackage main\n```\n");

    // When
    let blocks = extract(&source);

    // Then
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].content(), "bad \u{fffd} byte\n");
    assert_eq!(blocks[1].language(), "go");
}

#[test]
fn should_never_return_empty_language_or_content() {
    // Given
    let markdown = "```\n```\n\n```go\n```\n\n```\nx\n```\n\n~~~ \nx\n~~~\n";

    // When
    let blocks = extract_from_str(markdown);

    // Then
    assert!(blocks.is_empty());
}

#[test]
fn should_preserve_crlf_line_endings() {
    // Given / When
    let blocks = fixture("crlf.md");

    // Then
    assert_eq!(
        summary(&blocks),
        vec![
            ("go", "package main\r\n\r\nfunc x() {}\r\n"),
            ("sh", "echo quoted\r\n"),
        ]
    );
}

#[test]
fn should_keep_mixed_line_endings_as_written() {
    // Given
    let source = b"```go\r\npackage main\nfunc x() {}\r\n```\r\n";

    // When
    let blocks = extract(source);

    // Then
    assert_eq!(summary(&blocks), vec![("go", "package main\nfunc x() {}\r\n")]);
}

#[test]
fn should_read_language_tag_as_raw_text() {
    // Given
    let markdown = "```c\\+\\+\nint x;\n```\n\n```&#103;o\npackage main\n```\n";

    // When
    let blocks = extract_from_str(markdown);

    // Then
    assert_eq!(blocks[0].language(), "c\\+\\+");
    assert_eq!(blocks[1].language(), "&#103;o");
    assert_eq!(codeblocks::resolve(blocks[0].language()), "txt");
    assert_eq!(codeblocks::resolve(blocks[1].language()), "txt");
}
