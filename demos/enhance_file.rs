//! Example: Enhance a single WAV file
//!
//! ```text
//! cargo run --example enhance_file -- input.wav enhanced.wav
//! ```

use voxclean_dsp::io::enhance_wav_file;
use voxclean_dsp::EnhancementConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let (input, output) = match (args.next(), args.next()) {
        (Some(input), Some(output)) => (input, output),
        _ => {
            eprintln!("usage: enhance_file <input.wav> <output.wav>");
            std::process::exit(2);
        }
    };

    let config = EnhancementConfig::default();
    let result = enhance_wav_file(&input, &output, &config)?;

    println!("Enhanced {} -> {}", input, output);
    println!("{}", serde_json::to_string_pretty(&result.metadata)?);

    Ok(())
}
