use anyhow::Result;
use vidgrab_core::table::render_format_table;
use vidgrab_core::{Config, ExtractError, Extractor};

pub async fn run(url: &str, config: &Config) -> Result<()> {
    let extractor = Extractor::from_config(config)?;

    println!("Available formats for: {}\n", url);

    let media = extractor.info(url).await?;
    let formats = media.formats();
    if formats.is_empty() {
        return Err(ExtractError::NoFormats.into());
    }

    println!("{}", render_format_table(formats));
    println!("Use -f FORMAT_ID to download a specific format");
    println!("   Example: vidgrab download URL -f 137+140");

    Ok(())
}
