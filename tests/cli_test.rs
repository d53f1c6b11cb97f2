use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn source_file(source: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(source.as_bytes()).expect("write temp file");
    file
}

#[test]
fn prints_tree_for_valid_program() {
    let file = source_file("int main(void) { return 0; }\n");
    let mut cmd = cargo_bin_cmd!("cminus");
    cmd.arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("program (1)\n  declaration_list (1)\n"))
        .stdout(predicate::str::contains("        RETURN: return"))
        .stderr(predicate::str::is_empty());
}

#[test]
fn lex_only_dumps_tokens() {
    let file = source_file("} x <= 3\n");
    let mut cmd = cargo_bin_cmd!("cminus");
    cmd.arg("-l").arg(file.path());

    cmd.assert().success().stdout(
        "Token {name: RC, line: 1, value: }}\n\
         Token {name: ID, line: 1, value: x}\n\
         Token {name: LEQ, line: 1, value: <=}\n\
         Token {name: INT, line: 1, value: 3}\n",
    );
}

#[test]
fn debug_lexicon_dumps_tokens_then_tree() {
    let file = source_file("int x;");
    let mut cmd = cargo_bin_cmd!("cminus");
    cmd.arg("--debug-lexicon").arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("Token {name: TYPE, line: 1, value: int}\n"))
        .stdout(predicate::str::contains("Token {name: SEMI, line: 1, value: ;}\nprogram (1)\n"));
}

#[test]
fn expression_mode_with_indent() {
    let file = source_file("a < b\n");
    let mut cmd = cargo_bin_cmd!("cminus");
    cmd.args(["-e", "-i", "1", "--indent-width", "4"]).arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("    expression (1)\n        simple_expression (1)\n"));
}

#[test]
fn lexical_error_fails_with_one_line() {
    let file = source_file("int x;\nint y$;\n");
    let mut cmd = cargo_bin_cmd!("cminus");
    cmd.arg(file.path());

    let assert = cmd
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr("lexical error at line 2, type BAD_CHAR\n");
    assert_eq!(String::from_utf8_lossy(&assert.get_output().stderr).lines().count(), 1);
}

#[test]
fn syntax_error_fails() {
    let file = source_file("int main(void) {\n  return 0\n}\n");
    let mut cmd = cargo_bin_cmd!("cminus");
    cmd.arg(file.path());

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr("Syntax error at line 3 (expected SEMI in return_stmt)\n");
}

#[test]
fn extra_tokens_fail() {
    let file = source_file("int main(void) { return 0; } }");
    let mut cmd = cargo_bin_cmd!("cminus");
    cmd.arg(file.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("syntactic panic: extra tokens at line 1"));
}

#[test]
fn token_limit_is_enforced() {
    let file = source_file("int x; int y;");
    let mut cmd = cargo_bin_cmd!("cminus");
    cmd.args(["--max-tokens", "3"]).arg(file.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("too many tokens"));
}

#[test]
fn source_ending_inside_token_fails() {
    let file = source_file("int x;\nint y");
    let mut cmd = cargo_bin_cmd!("cminus");
    cmd.arg(file.path());

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr("lexical error at line 2, type UNEXPECTED_EOF\n");
}

#[test]
fn non_utf8_byte_is_a_bad_char() {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(b"int x;\n\xff\n").expect("write temp file");
    let mut cmd = cargo_bin_cmd!("cminus");
    cmd.arg(file.path());

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr("lexical error at line 2, type BAD_CHAR\n");
}

#[test]
fn deep_nesting_is_reported_not_crashed() {
    let depth = 10_000;
    let source = format!("{}1{}\n", "(".repeat(depth), ")".repeat(depth));
    let file = source_file(&source);
    let mut cmd = cargo_bin_cmd!("cminus");
    cmd.arg("-e").arg(file.path());

    cmd.assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr("Syntax error at line 1 (nesting too deep in expression)\n");
}

#[test]
fn missing_source_argument() {
    let mut cmd = cargo_bin_cmd!("cminus");

    cmd.assert()
        .failure()
        .stderr("missing source file\n");
}

#[test]
fn unreadable_source_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let mut cmd = cargo_bin_cmd!("cminus");
    cmd.arg(dir.path().join("absent.c"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::starts_with("open source file failed: "));
}

#[test]
fn verbose_logs_to_stderr_only() {
    let file = source_file("int x;");
    let mut cmd = cargo_bin_cmd!("cminus");
    cmd.arg("-v").arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("program (1)\n"))
        .stderr(predicate::str::contains("scanned"));
}
