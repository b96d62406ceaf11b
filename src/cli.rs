//! Command-line WAV time stretcher.

use wsola::io::wav;
use wsola::{WindowType, Wsola};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        print_usage();
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = &args[2];

    let mut ratio: Option<f64> = None;
    let mut window_size: Option<usize> = None;
    let mut hop_analysis: Option<usize> = None;
    let mut max_delta: usize = 0;
    let mut window_type = WindowType::Hann;
    let mut gain: Option<f32> = None;
    let mut pcm16 = false;
    let mut print_params = false;
    let mut verbose = false;

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--ratio" | "-r" => {
                i += 1;
                ratio = Some(parse_f64(&args, i, "ratio"));
            }
            "--window" => {
                i += 1;
                window_size = Some(parse_usize(&args, i, "window"));
            }
            "--hop" => {
                i += 1;
                hop_analysis = Some(parse_usize(&args, i, "hop"));
            }
            "--delta" => {
                i += 1;
                max_delta = parse_usize(&args, i, "delta");
            }
            "--window-type" => {
                i += 1;
                window_type = match args.get(i).map(String::as_str) {
                    Some("hann") => WindowType::Hann,
                    Some("blackman-harris") => WindowType::BlackmanHarris,
                    other => {
                        eprintln!("Unknown window type: {:?}", other);
                        std::process::exit(1);
                    }
                };
            }
            "--gain" => {
                i += 1;
                gain = Some(parse_f64(&args, i, "gain") as f32);
            }
            "--pcm16" => pcm16 = true,
            "--print-params" => print_params = true,
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let ratio = ratio.unwrap_or_else(|| {
        eprintln!("Missing required --ratio");
        std::process::exit(1);
    });

    let wsola = match (window_size, hop_analysis) {
        (None, None) => Wsola::new(ratio),
        (Some(w), Some(h)) => Wsola::with_params(ratio, w, h, max_delta),
        _ => {
            eprintln!("--window and --hop must be given together");
            std::process::exit(1);
        }
    };
    let mut wsola = match wsola {
        Ok(w) => w.with_window_type(window_type),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(g) = gain {
        wsola = wsola.with_gain_correction(g);
    }

    let input = match wav::read_wav_file(input_path) {
        Ok(sig) => sig,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    if print_params {
        let report = wsola.params_for_rate(input.sample_rate);
        match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Could not serialize parameter report: {}", e),
        }
    }

    if verbose {
        println!(
            "Input: {} samples at {} Hz ({:.2}s)",
            input.len(),
            input.sample_rate,
            input.duration_secs()
        );
    }

    let output = wsola.apply_to(&input);

    let write_result = if pcm16 {
        wav::write_wav_file_pcm16(output_path, &output)
    } else {
        wav::write_wav_file_float(output_path, &output)
    };
    if let Err(e) = write_result {
        eprintln!("Error writing {}: {}", output_path, e);
        std::process::exit(1);
    }

    if verbose {
        println!(
            "Output: {} samples at {} Hz ({:.2}s)",
            output.len(),
            output.sample_rate,
            output.duration_secs()
        );
    }
}

fn parse_f64(args: &[String], i: usize, name: &str) -> f64 {
    args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        eprintln!("Invalid value for --{}", name);
        std::process::exit(1);
    })
}

fn parse_usize(args: &[String], i: usize, name: &str) -> usize {
    args.get(i).and_then(|s| s.parse().ok()).unwrap_or_else(|| {
        eprintln!("Invalid value for --{}", name);
        std::process::exit(1);
    })
}

fn print_usage() {
    println!("wsola - change audio duration without altering pitch");
    println!();
    println!("Usage: wsola <input.wav> <output.wav> --ratio <R> [options]");
    println!();
    println!("Options:");
    println!("  -r, --ratio <R>         Stretch ratio (>1 slower, <1 faster). Required.");
    println!("      --window <N>        Analysis window size in samples");
    println!("      --hop <N>           Analysis hop in samples (requires --window)");
    println!("      --delta <N>         Max search delta (0 = derive from hop)");
    println!("      --window-type <T>   hann (default) or blackman-harris");
    println!("      --gain <F>          Override the overlap-add gain correction");
    println!("      --pcm16             Write 16-bit PCM instead of 32-bit float");
    println!("      --print-params      Print the resolved parameters as JSON");
    println!("  -v, --verbose           Print input/output summaries");
    println!("  -h, --help              Show this help");
}
