//! Integration tests for fixml
//!
//! These tests verify that the components work together correctly

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::io::{BufReader, Cursor};

use fixml::format::{fingerprint, semantic_form, XmlIndenter};
use fixml::parser::{is_container_element, is_opening_tag, is_self_contained};
use fixml::process::{normalize_and_deduplicate, process_document};
use fixml::Config;

/// A project file with ragged indentation, blank lines, and duplicate
/// package references spelled three different ways
fn messy_project() -> String {
    [
        "<Project Sdk=\"Microsoft.NET.Sdk\">",
        "",
        "    <PropertyGroup>",
        "  <TargetFramework>net8.0</TargetFramework>",
        "\t<Nullable>enable</Nullable>",
        "    </PropertyGroup>",
        "",
        "  <ItemGroup>",
        "<PackageReference Include=\"Serilog\" Version=\"3.1.1\" />",
        "      <PackageReference Include=\"Serilog\"   Version=\"3.1.1\" />",
        "  </ItemGroup>",
        "",
        "  <ItemGroup>",
        "    <PackageReference Include='Serilog' Version='3.1.1' />",
        "  </ItemGroup>",
        "",
        "</Project>",
    ]
    .join("\n")
}

#[test]
fn test_complete_project_walkthrough() {
    let mut indenter = XmlIndenter::new();

    // <Project> opens the document
    assert_eq!(indenter.indent_for("<Project>"), "");
    indenter.advance("<Project>");
    assert_eq!(indenter.depth(), 1);

    // <ItemGroup> nests one level in
    assert_eq!(indenter.indent_for("<ItemGroup>"), "  ");
    indenter.advance("<ItemGroup>");
    assert_eq!(indenter.depth(), 2);

    // A self-closing item sits inside the group and opens nothing
    assert_eq!(indenter.indent_for("<Compile Include=\"a.cs\" />"), "    ");
    indenter.advance("<Compile Include=\"a.cs\" />");
    assert_eq!(indenter.depth(), 2);

    // Closing tags step back out to their opener's column
    assert_eq!(indenter.indent_for("</ItemGroup>"), "  ");
    indenter.advance("</ItemGroup>");
    assert_eq!(indenter.depth(), 1);

    assert_eq!(indenter.indent_for("</Project>"), "");
    indenter.advance("</Project>");
    assert_eq!(indenter.depth(), 0);
}

#[test]
fn test_classification_agreement() {
    // A bare structural tag is a container and an opener
    assert!(is_container_element("<ItemGroup>"));
    assert!(is_opening_tag("<ItemGroup>"));
    assert!(!is_self_contained("<ItemGroup>"));

    // An attribute-free one-line element is a container but never an opener
    assert!(is_container_element("<Tag>v</Tag>"));
    assert!(is_self_contained("<Tag>v</Tag>"));
    assert!(!is_opening_tag("<Tag>v</Tag>"));

    // An attribute carrier can be deduplicated and opens nothing when self-closing
    assert!(!is_container_element("<Item Include=\"a\" />"));
    assert!(!is_opening_tag("<Item Include=\"a\" />"));

    // With a closing pair on one line it still opens nothing
    assert!(is_self_contained("<Item Include=\"a\">x</Item>"));
    assert!(!is_opening_tag("<Item Include=\"a\">x</Item>"));

    // Without the closing pair it does open
    assert!(is_opening_tag("<Item Include=\"a\">"));
}

#[test]
fn test_semantic_form_drives_deduplication() {
    let canonical = "<PackageReference Include=\"Xunit\" Version=\"2.6.1\" />";
    let spaced = "<PackageReference   Include=\"Xunit\"   Version=\"2.6.1\" />";
    let single_quoted = "<PackageReference Include='Xunit' Version='2.6.1' />";

    assert_eq!(semantic_form(spaced), semantic_form(canonical));
    assert_eq!(fingerprint(single_quoted), fingerprint(canonical));

    let input = format!("<r>\n{canonical}\n{spaced}\n{single_quoted}\n</r>\n");
    let (output, removed) = normalize_and_deduplicate(&input);
    assert_eq!(removed, 2);
    assert_eq!(output, format!("<r>\n  {canonical}\n</r>\n"));
}

#[test]
fn test_messy_project_cleaned() {
    let expected = [
        "<Project Sdk=\"Microsoft.NET.Sdk\">",
        "  <PropertyGroup>",
        "    <TargetFramework>net8.0</TargetFramework>",
        "    <Nullable>enable</Nullable>",
        "  </PropertyGroup>",
        "  <ItemGroup>",
        "    <PackageReference Include=\"Serilog\" Version=\"3.1.1\" />",
        "  </ItemGroup>",
        "  <ItemGroup>",
        "  </ItemGroup>",
        "</Project>",
        "",
    ]
    .join("\n");

    let (output, removed) = normalize_and_deduplicate(&messy_project());
    assert_eq!(output, expected);
    assert_eq!(removed, 2);
}

#[test]
fn test_second_pass_changes_nothing() {
    let (first, first_removed) = normalize_and_deduplicate(&messy_project());
    let (second, second_removed) = normalize_and_deduplicate(&first);
    assert!(first_removed > 0);
    assert_eq!(second, first);
    assert_eq!(second_removed, 0);
}

#[test]
fn test_flat_input_gains_structure() {
    let input =
        "<Project>\n<PropertyGroup>\n<OutputType>Exe</OutputType>\n</PropertyGroup>\n</Project>\n";
    let (output, removed) = normalize_and_deduplicate(input);
    assert_eq!(
        output,
        "<Project>\n  <PropertyGroup>\n    <OutputType>Exe</OutputType>\n  </PropertyGroup>\n</Project>\n"
    );
    assert_eq!(removed, 0);
}

#[test]
fn test_repeated_structure_sections_survive() {
    let input = "<Root>\n<Group>\n<Entry Key=\"a\" />\n</Group>\n<Group>\n<Entry Key=\"b\" />\n</Group>\n</Root>\n";
    let (output, removed) = normalize_and_deduplicate(input);
    assert_eq!(removed, 0);
    assert_eq!(
        output,
        "<Root>\n  <Group>\n    <Entry Key=\"a\" />\n  </Group>\n  <Group>\n    <Entry Key=\"b\" />\n  </Group>\n</Root>\n"
    );
}

#[test]
fn test_comment_and_declaration_lines_flow_through() {
    let input = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Project>\n<!-- sources -->\n<Compile Include=\"a.cs\" />\n</Project>\n";
    let (output, removed) = normalize_and_deduplicate(input);
    assert_eq!(removed, 0);
    assert_eq!(
        output,
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Project>\n  <!-- sources -->\n  <Compile Include=\"a.cs\" />\n</Project>\n"
    );
}

#[test]
fn test_bom_and_crlf_sources_agree() {
    let unix = "<a>\n<b v=\"1\" />\n</a>\n";
    let windows = "\u{feff}<a>\r\n<b v=\"1\" />\r\n</a>\r\n";

    let (from_unix, _) = normalize_and_deduplicate(unix);
    let (from_windows, _) = normalize_and_deduplicate(windows);
    assert_eq!(from_unix, from_windows);
    assert!(!from_windows.contains('\u{feff}'));
    assert!(!from_windows.contains('\r'));
}

#[test]
fn test_declaration_injection_end_to_end() {
    let config = Config {
        fix_warnings: true,
        ..Default::default()
    };
    let input = "<Project>\n<Target Name=\"Build\" />\n</Project>\n";

    let reader = BufReader::new(Cursor::new(input.as_bytes()));
    let mut output = Vec::new();
    let report = process_document(reader, &mut output, &config, "app.csproj").unwrap();

    let result = String::from_utf8(output).unwrap();
    assert!(result.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Project>"));
    assert!(report.missing_declaration);
    assert!(report.declaration_added);

    // The fixed output passes a second run unchanged
    let reader = BufReader::new(Cursor::new(result.as_bytes()));
    let mut second = Vec::new();
    let report = process_document(reader, &mut second, &config, "app.csproj").unwrap();
    assert!(!report.missing_declaration);
    assert!(!report.declaration_added);
    assert_eq!(String::from_utf8(second).unwrap(), result);
}

#[test]
fn test_report_counts_duplicates_through_document_api() {
    let config = Config::default();
    let reader = BufReader::new(Cursor::new(messy_project()));
    let mut output = Vec::new();

    let report = process_document(reader, &mut output, &config, "messy.csproj").unwrap();
    assert_eq!(report.duplicates_removed, 2);
    assert!(report.missing_declaration);
    assert!(!report.declaration_added);
}

#[test]
fn test_invalid_utf8_input_is_an_error() {
    let config = Config::default();
    let bytes: &[u8] = &[0x3c, 0x61, 0x3e, 0xff, 0xfe, 0x3c, 0x2f, 0x61, 0x3e];
    let reader = BufReader::new(Cursor::new(bytes));
    let mut output = Vec::new();

    assert!(process_document(reader, &mut output, &config, "bad.xml").is_err());
}

#[test]
fn test_deep_nesting_closers_align() {
    let mut input = String::new();
    for i in 0..80 {
        input.push_str(&format!("<level{i}>\n"));
    }
    for i in (0..80).rev() {
        input.push_str(&format!("</level{i}>\n"));
    }

    let (output, removed) = normalize_and_deduplicate(&input);
    assert_eq!(removed, 0);

    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 160);
    for i in 0..80 {
        let open = lines[i];
        let close = lines[159 - i];
        let open_indent = open.len() - open.trim_start().len();
        let close_indent = close.len() - close.trim_start().len();
        assert_eq!(open_indent, close_indent);
        assert_eq!(open_indent, i * 2);
    }
}
