use super::Bubble;
use super::BubbleAlignment;
use crate::domain::models::Message;
use crate::domain::models::Role;

fn create_lines(role: Role, alignment: BubbleAlignment, codeblock_count: usize, text: &str) -> String {
    let message = Message::new(role, text);
    let lines = Bubble::new(&message, alignment, 50, codeblock_count).as_lines();

    return lines
        .iter()
        .map(|line| {
            return line
                .spans
                .iter()
                .map(|span| {
                    return span.content.to_string();
                })
                .collect::<Vec<String>>()
                .join("");
        })
        .collect::<Vec<String>>()
        .join("\n");
}

#[test]
fn it_creates_assistant_text() {
    let lines_str = create_lines(Role::Assistant, BubbleAlignment::Left, 0, "Hi there!");
    insta::assert_snapshot!(lines_str, @r###"
    ╭ThinkScript KB──╮
    │ Hi there!      │
    ╰────────────────╯
    "###);
}

#[test]
fn it_wraps_long_assistant_text() {
    let lines_str = create_lines(Role::Assistant, BubbleAlignment::Left, 0, "Hi there! This is a really long line that pushes the boundaries of 50 characters across the screen, resulting in a bubble where the line is wrapped to the next line. Cool right?");
    insta::assert_snapshot!(lines_str, @r###"
    ╭ThinkScript KB───────────────────────────────╮
    │ Hi there! This is a really long line that   │
    │ pushes the boundaries of 50 characters      │
    │ across the screen, resulting in a bubble    │
    │ where the line is wrapped to the next line. │
    │ Cool right?                                 │
    ╰─────────────────────────────────────────────╯
    "###);
}

#[test]
fn it_numbers_code_blocks_after_earlier_messages() {
    let text = "Here's how to plot.\n\n```thinkscript\nplot Avg = Average(close, 9);\n```";
    let lines_str = create_lines(Role::Assistant, BubbleAlignment::Left, 1, text);
    insta::assert_snapshot!(lines_str, @r###"
    ╭ThinkScript KB───────────────────╮
    │ Here's how to plot.             │
    │                                 │
    │ ┌─ code (2)                     │
    │ │ plot Avg = Average(close, 9); │
    │ └─                              │
    ╰─────────────────────────────────╯
    "###);
}

#[test]
fn it_renders_headings_and_subheadings() {
    let text = "# Moving Averages\n\n### Inputs\n- Length: bars to average";
    let lines_str = create_lines(Role::Assistant, BubbleAlignment::Left, 0, text);
    insta::assert_snapshot!(lines_str, @r###"
    ╭ThinkScript KB─────────────╮
    │ Moving Averages           │
    │                           │
    │ • Inputs                  │
    │ - Length: bars to average │
    ╰───────────────────────────╯
    "###);
}

#[test]
fn it_renders_an_empty_answer_while_loading() {
    let lines_str = create_lines(Role::Assistant, BubbleAlignment::Left, 0, "");
    insta::assert_snapshot!(lines_str, @r###"
    ╭ThinkScript KB──╮
    │                │
    ╰────────────────╯
    "###);
}

#[test]
fn it_right_aligns_user_text() {
    let lines_str = create_lines(Role::User, BubbleAlignment::Right, 0, "Hello");
    let indent = " ".repeat(40);

    assert_eq!(
        lines_str,
        [
            format!("{indent}╭You────╮"),
            format!("{indent}│ Hello │"),
            format!("{indent}╰───────╯"),
        ]
        .join("\n")
    );
}

#[test]
fn it_keeps_user_markdown_as_typed() {
    let lines_str = create_lines(Role::User, BubbleAlignment::Left, 0, "# not a heading");

    assert!(lines_str.contains("│ # not a heading │"));
}
