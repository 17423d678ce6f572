use sepolq_policy::{
    FsSource, Keyword, MemorySource, PolicyError, PolicySearch, QueryMode, SearchConfig, Shape,
};
use sepolq_policy::PolicySource;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const NET_IF: &str = "## <summary>Network</summary>\n\
interface(`net_conn_unix',`\n\
\x20 allow $1 self:unix_stream_socket connectto;\n\
')\n\
\n\
define(`net_simple', `tcp_socket')\n";

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("Failed to create dir");
    fs::write(path, content).expect("Failed to write file");
}

fn fs_search(dir: &Path) -> PolicySearch<FsSource> {
    let source = FsSource::new(dir, &SearchConfig::default()).expect("Failed to open tree");
    PolicySearch::new(source, QueryMode::Literal)
}

#[test]
fn test_multi_line_interface_from_disk() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "pol/foo.if", NET_IF);

    let construct = fs_search(&dir.path().join("pol"))
        .find("net_conn_unix")
        .expect("lookup failed");

    assert_eq!(construct.shape, Shape::Block);
    assert_eq!(construct.location.keyword, Some(Keyword::Interface));
    assert_eq!(construct.location.line, 1);
    assert_eq!(
        construct.text,
        "interface(`net_conn_unix',`\n  allow $1 self:unix_stream_socket connectto;\n')\n"
    );
}

#[test]
fn test_single_line_define_from_disk() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "foo.if", NET_IF);

    let construct = fs_search(dir.path())
        .find("net_simple")
        .expect("lookup failed");

    assert_eq!(construct.shape, Shape::SingleLine);
    assert_eq!(construct.location.keyword, Some(Keyword::Define));
    assert_eq!(construct.text, "define(`net_simple', `tcp_socket')\n");
}

#[test]
fn test_query_not_found() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "foo.if", NET_IF);

    let result = fs_search(dir.path()).find("net_conn_missing");

    match result {
        Err(e @ PolicyError::QueryNotFound(_)) => {
            assert_eq!(e.to_string(), "Unable to find query: 'net_conn_missing'");
        }
        other => panic!("Expected QueryNotFound, got {:?}", other),
    }
}

#[test]
fn test_empty_tree_reported_before_matching() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "module.te", "type foo_t;\n");

    // An invalid regex query would fail to compile if matching were attempted
    let source = FsSource::new(dir.path(), &SearchConfig::default()).expect("source");
    let result = PolicySearch::new(source, QueryMode::Regex).find("broken(");

    assert!(matches!(result, Err(PolicyError::NoCandidateFiles { .. })));
}

#[test]
fn test_interface_file_preferred_over_support_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(
        dir.path(),
        "support/aaa_macros.spt",
        "define(`dup',`\n  from support\n')\n",
    );
    write(
        dir.path(),
        "modules/zzz.if",
        "interface(`dup',`\n  from interface\n')\n",
    );

    let construct = fs_search(dir.path()).find("dup").expect("lookup failed");

    assert!(construct.location.path.ends_with("zzz.if"));
    assert!(construct.text.contains("from interface"));
}

#[test]
fn test_support_file_used_when_no_interface_declares_query() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "modules/kernel.if", NET_IF);
    write(
        dir.path(),
        "support/obj_perm_sets.spt",
        "define(`rw_file_perms', `{ open read write }')\n",
    );

    let construct = fs_search(dir.path())
        .find("rw_file_perms")
        .expect("lookup failed");

    assert!(construct.location.path.ends_with("obj_perm_sets.spt"));
    assert_eq!(construct.shape, Shape::SingleLine);
}

#[test]
fn test_unterminated_block_is_malformed() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "broken.if", "interface(`open_ended',`\n  allow $1 self:file read;\n");

    let result = fs_search(dir.path()).find("open_ended");

    assert!(matches!(
        result,
        Err(PolicyError::MalformedConstruct { line_number: 1, .. })
    ));
}

#[test]
fn test_crlf_policy_file() {
    let source = MemorySource::new().with_file("a.if", "interface(`foo',`\r\n  body\r\n')\r\n");

    let construct = PolicySearch::new(source, QueryMode::Literal)
        .find("foo")
        .expect("lookup failed");

    assert_eq!(construct.shape, Shape::Block);
    assert_eq!(construct.text, "interface(`foo',`\r\n  body\r\n')\r\n");
}

#[test]
fn test_regex_alternation_query() {
    let source = MemorySource::new().with_file("b.if", "interface(`bar',`\n')\n");

    let construct = PolicySearch::new(source, QueryMode::Regex)
        .find("nomatch|bar")
        .expect("lookup failed");

    assert_eq!(construct.location.line, 0);
    assert_eq!(construct.text, "interface(`bar',`\n')\n");
}

#[test]
fn test_regex_mode_finds_first_of_family() {
    let source = MemorySource::new()
        .with_file("a.if", "interface(`net_conn_tcp',`\n')\ninterface(`net_conn_unix',`\n')\n");

    let construct = PolicySearch::new(source, QueryMode::Regex)
        .find("net_conn_.*")
        .expect("lookup failed");

    assert_eq!(construct.text, "interface(`net_conn_tcp',`\n')\n");
}

#[test]
fn test_literal_mode_does_not_treat_query_as_regex() {
    let source = MemorySource::new().with_file("a.if", "interface(`net_conn_tcp',`\n')\n");

    let result = PolicySearch::new(source, QueryMode::Literal).find("net_conn_.*");

    assert!(matches!(result, Err(PolicyError::QueryNotFound(_))));
}

#[test]
fn test_same_source_answers_repeated_queries() {
    let source = MemorySource::new().with_file("a.if", NET_IF);
    let search = PolicySearch::new(source, QueryMode::Literal);

    let first = search.find("net_conn_unix").expect("lookup failed");
    let second = search.find("net_simple").expect("lookup failed");

    assert_eq!(first.line_count(), 3);
    assert_eq!(second.line_count(), 1);
    assert_eq!(search.source().candidates().expect("candidates").len(), 1);
}
