//! Basic example of exporting rows to an XLSX file

use sheetstream::IterSource;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let rows = vec![
        vec!["ID", "Name", "Email"],
        vec!["1", "Alice Johnson", "alice@example.com"],
        vec!["2", "Bob Smith", "bob@example.com"],
        vec!["3", "Carol White", "carol@example.com"],
    ];

    let owned: Vec<Vec<String>> = rows
        .into_iter()
        .map(|row| row.into_iter().map(String::from).collect())
        .collect();

    sheetstream::export("demos/output.xlsx", &mut IterSource::new(owned.into_iter()))?;

    println!("Excel file created successfully: demos/output.xlsx");
    Ok(())
}
