use colored::Colorize;
use tabled::builder::Builder;
use tabled::settings::Style;
use typegraph_schema::GeneratedSchema;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Prints definition counts, interface implementations and streaming fields.
pub fn print_summary(schema: &GeneratedSchema) {
    println!("{}", summary_table(schema));

    if !schema.implementations.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Implementation", "Source"]);
        for (name, key) in &schema.implementations {
            builder.push_record([name.as_str(), key.as_str()]);
        }
        println!("{}", builder.build().with(Style::rounded()));
    }

    let streams: Vec<String> = schema
        .streaming_fields()
        .map(|b| format!("{}.{}", b.parent_type, b.field))
        .collect();
    if !streams.is_empty() {
        println!("{}: {}", "Streams".cyan(), streams.join(", "));
    }
}

fn summary_table(schema: &GeneratedSchema) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Definition", "Count"]);
    for (keyword, count) in schema.definition_counts() {
        builder.push_record([keyword.to_string(), count.to_string()]);
    }
    builder.build().with(Style::rounded()).to_string()
}
