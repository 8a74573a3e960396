//! Lists the latest calls of every customer on the first page.
//!
//! Reads the API settings from the environment:
//! `FREESPEE_API_URL`, `FREESPEE_USERNAME` and `FREESPEE_PASSWORD`.
//!
//! Run with: `cargo run --example list_calls`

use freespee::{ApiOptions, Client, Error, Params};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("freespee=debug,list_calls=info")
        .init();

    let options: ApiOptions = [
        ("api_url", std::env::var("FREESPEE_API_URL").ok()),
        ("username", std::env::var("FREESPEE_USERNAME").ok()),
        ("password", std::env::var("FREESPEE_PASSWORD").ok()),
    ]
    .into_iter()
    .collect();

    let client = Client::with_http(options)?;

    println!("Total customers: {}", client.get_total_number_of_customers().await?);

    for customer in client.find_all_customers(0).await? {
        println!(
            "=== {} ({}) ===",
            customer.name.as_deref().unwrap_or("-"),
            customer.customer_number.as_deref().unwrap_or("-")
        );

        let params = Params::new().with("extended", 1).with("pagesize", 10);
        println!("Query: {}", client.format_parameters(&params).join(", "));

        match client.find_calls(&customer, params).await {
            Ok(calls) => {
                println!("Page {}/{}, {} calls total", calls.page, calls.number_of_pages, calls.total);
                for call in &calls.results {
                    let source = call
                        .extended
                        .as_ref()
                        .and_then(|e| e.source_name.as_deref())
                        .unwrap_or("-");
                    println!(
                        "  {} {} -> {} {}s answered={} source={}",
                        call.start,
                        call.anum.as_deref().unwrap_or("anonymous"),
                        call.bnum.as_deref().unwrap_or("-"),
                        call.duration,
                        call.answered,
                        source
                    );
                }
            }
            Err(Error::ApiCall { payload }) => println!("  API error: {}", payload),
            Err(e) => return Err(e),
        }
        println!();
    }

    Ok(())
}
