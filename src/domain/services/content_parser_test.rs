use test_utils::thinkscript_fixture;

use super::classify;
use super::strip_bold;
use super::ContentParser;
use super::LineKind;
use crate::domain::models::Block;
use crate::domain::models::ParsedContent;
use crate::domain::models::Subheading;

mod classify {
    use super::*;

    #[test]
    fn it_classifies_fences_first() {
        assert_eq!(classify("```thinkscript"), LineKind::CodeFence);
        assert_eq!(classify("  ```"), LineKind::PlainText);
    }

    #[test]
    fn it_classifies_blank_lines() {
        assert_eq!(classify(""), LineKind::Blank);
        assert_eq!(classify("   \t"), LineKind::Blank);
    }

    #[test]
    fn it_classifies_headings() {
        assert_eq!(
            classify("# Moving Averages"),
            LineKind::Heading("Moving Averages".to_string())
        );
        assert_eq!(
            classify("### Inputs"),
            LineKind::BulletHeading("Inputs".to_string())
        );
        assert_eq!(classify("## Two hashes"), LineKind::PlainText);
        assert_eq!(classify("#NoSpace"), LineKind::PlainText);
    }

    #[test]
    fn it_classifies_numbered_items() {
        assert_eq!(
            classify("12. Twelfth"),
            LineKind::NumberedItem(12, "12".to_string(), "Twelfth".to_string())
        );
        assert_eq!(
            classify("3.Tight"),
            LineKind::NumberedItem(3, "3".to_string(), "Tight".to_string())
        );
        assert_eq!(
            classify("01. Leading zero"),
            LineKind::NumberedItem(1, "01".to_string(), "Leading zero".to_string())
        );
        assert_eq!(classify("99999999999999999999999. Huge"), LineKind::PlainText);
    }

    #[test]
    fn it_classifies_colon_subheadings() {
        assert_eq!(
            classify("- Length: bars to average"),
            LineKind::ColonSubheading("Length".to_string(), true)
        );
        assert_eq!(
            classify("• Notes"),
            LineKind::ColonSubheading("Notes".to_string(), false)
        );
        assert_eq!(
            classify("- Trailing:"),
            LineKind::ColonSubheading("Trailing:".to_string(), false)
        );
    }

    #[test]
    fn it_classifies_plain_text() {
        assert_eq!(classify("Just a sentence: with a colon"), LineKind::PlainText);
    }
}

#[test]
fn it_strips_bold_markers() {
    assert_eq!(strip_bold("**Bold** and *italic*"), "Bold and *italic*");
}

#[test]
fn it_parses_empty_content() {
    assert_eq!(ContentParser::parse(""), ParsedContent::default());
}

#[test]
fn it_parses_fixture() {
    let parsed = ContentParser::parse(thinkscript_fixture());

    assert_eq!(
        parsed.text,
        [
            "# Moving Average Crossover",
            "",
            "Here's a simple study that plots two moving averages.",
            "",
            "• Inputs",
            "- Fast length: the shorter average",
            "- Slow length: the longer average",
            "- Notes",
            "",
            "[CODE_BLOCK_0]",
            "",
            "1. Add the study to a chart.",
            "2. Adjust the lengths to taste.",
            "",
            "[CODE_BLOCK_1]",
            "",
        ]
        .join("\n")
    );
    assert_eq!(parsed.headings, vec!["Moving Average Crossover".to_string()]);
    assert_eq!(parsed.code_blocks.len(), 2);
    insta::assert_snapshot!(parsed.code_blocks[0], @r###"
    input fastLength = 9;
    input slowLength = 21;

    plot Fast = Average(close, fastLength);
    plot Slow = Average(close, slowLength);
    "###);
    assert_eq!(parsed.code_blocks[1], "AddLabel(yes, \"Crossover\");");

    let subheadings = parsed
        .subheadings
        .iter()
        .map(|e| return (e.text.as_str(), e.has_bullet, e.is_numbered, e.number))
        .collect::<Vec<_>>();
    assert_eq!(
        subheadings,
        vec![
            ("Inputs", true, false, None),
            ("Fast length", true, false, None),
            ("Slow length", true, false, None),
            ("Notes", false, false, None),
            ("Add the study to a chart.", false, true, Some(1)),
            ("Adjust the lengths to taste.", false, true, Some(2)),
        ]
    );
}

#[test]
fn it_extracts_bullet_heading() {
    let parsed = ContentParser::parse("### Example");

    assert_eq!(
        parsed.subheadings,
        vec![Subheading {
            text: "Example".to_string(),
            has_bullet: true,
            is_numbered: false,
            number: None,
        }]
    );
    assert!(parsed.headings.is_empty());
    assert_eq!(parsed.text, "• Example\n");
    assert_eq!(
        parsed.blocks,
        vec![Block::Subheading(0, "• Example".to_string())]
    );
}

#[test]
fn it_strips_bold_from_headings() {
    let parsed = ContentParser::parse("# **Plotting** basics");

    assert_eq!(parsed.headings, vec!["Plotting basics".to_string()]);
    assert_eq!(parsed.text, "# Plotting basics\n");
}

#[test]
fn it_counts_and_trims_code_blocks() {
    let parsed = ContentParser::parse("```\n\n  a\n  b  \n\n```\n```js\nx\n```");

    assert_eq!(parsed.code_blocks, vec!["a\n  b".to_string(), "x".to_string()]);
    assert_eq!(parsed.text, "[CODE_BLOCK_0]\n[CODE_BLOCK_1]\n");
    assert_eq!(parsed.blocks, vec![Block::Code(0), Block::Code(1)]);
}

#[test]
fn it_keeps_code_verbatim() {
    let parsed = ContentParser::parse("```\n# not a heading\n1. not a list\n```");

    assert!(parsed.headings.is_empty());
    assert!(parsed.subheadings.is_empty());
    assert_eq!(parsed.code_blocks, vec!["# not a heading\n1. not a list".to_string()]);
}

#[test]
fn it_keeps_indented_fences_inside_code_blocks() {
    let parsed = ContentParser::parse("```\nmarkdown:\n    ```\n    inner\n    ```\n```");

    assert_eq!(
        parsed.code_blocks,
        vec!["markdown:\n    ```\n    inner\n    ```".to_string()]
    );
    assert_eq!(parsed.text, "[CODE_BLOCK_0]\n");
}

#[test]
fn it_keeps_numbering_as_written() {
    let parsed = ContentParser::parse("01. First step\n02. Second step");

    assert_eq!(parsed.text, "01. First step\n02. Second step\n");
    assert_eq!(parsed.subheadings[0].number, Some(1));
    assert_eq!(parsed.subheadings[1].number, Some(2));
}

#[test]
fn it_trims_heading_text() {
    let parsed = ContentParser::parse("#   Padded heading  \n###  Padded bullet ");

    assert_eq!(parsed.headings, vec!["Padded heading".to_string()]);
    assert_eq!(parsed.subheadings[0].text, "Padded bullet");
}

#[test]
fn it_closes_unterminated_code_blocks() {
    let parsed = ContentParser::parse("Intro\n```thinkscript\nplot x = close;");

    assert_eq!(parsed.code_blocks, vec!["plot x = close;".to_string()]);
    assert_eq!(parsed.text, "Intro\n[CODE_BLOCK_0]\n");
}

#[test]
fn it_stays_in_numbered_mode() {
    let parsed = ContentParser::parse("1. First\n- Note: detail\nplain words\n2. Second");

    assert_eq!(parsed.subheadings.len(), 2);
    assert!(parsed.subheadings.iter().all(|e| return e.is_numbered));
    assert_eq!(parsed.text, "1. First\n2. Second\n");
}

#[test]
fn it_keeps_colon_subheadings_before_numbered_lists() {
    let parsed = ContentParser::parse("- Tip: use **Average**\n1. Step");

    assert_eq!(parsed.subheadings[0].text, "Tip");
    assert!(parsed.subheadings[0].has_bullet);
    assert_eq!(parsed.text, "- Tip: use **Average**\n1. Step\n");
}

#[test]
fn it_separates_paragraphs() {
    let parsed = ContentParser::parse("# Title\n\n\nFirst **line**\nSecond line");

    assert_eq!(parsed.text, "# Title\n\nFirst line\nSecond line\n");
    assert_eq!(
        parsed.blocks,
        vec![
            Block::Heading(0),
            Block::Break,
            Block::Text("First line".to_string()),
            Block::Text("Second line".to_string()),
        ]
    );
}

#[test]
fn it_keeps_placeholders_in_order() {
    let parsed = ContentParser::parse(thinkscript_fixture());

    let tokens = parsed
        .text
        .lines()
        .filter(|line| return line.starts_with("[CODE_BLOCK_"))
        .map(|line| return line.to_string())
        .collect::<Vec<String>>();
    let expected = (0..parsed.code_blocks.len())
        .map(ParsedContent::code_block_token)
        .collect::<Vec<String>>();

    assert_eq!(tokens, expected);
}

#[test]
fn it_does_not_extract_headings_twice() {
    let first = ContentParser::parse(thinkscript_fixture());
    let second = ContentParser::parse(&first.text);

    assert_eq!(second.headings, first.headings);
    assert!(second.code_blocks.is_empty());
}
