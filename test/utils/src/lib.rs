pub fn thinkscript_fixture() -> &'static str {
    return r#"
# Moving Average Crossover

Here's a **simple** study that plots two moving averages.

### Inputs
- Fast length: the shorter average
- Slow length: the longer average
- Notes

```thinkscript
input fastLength = 9;
input slowLength = 21;

plot Fast = Average(close, fastLength);
plot Slow = Average(close, slowLength);
```

1. Add the study to a chart.
2. Adjust the **lengths** to taste.
- Colors: pick anything
This line is dropped once the numbered list starts.

```
AddLabel(yes, "Crossover");
```
"#
    .trim();
}

/// Builds a server-sent-event body where every fragment is sent as its own
/// `data:` line followed by a blank separator line.
pub fn sse_body(fragments: &[&str]) -> String {
    return fragments
        .iter()
        .map(|fragment| {
            return format!("data: {}\n\n", fragment);
        })
        .collect::<Vec<String>>()
        .join("");
}
