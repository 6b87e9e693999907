use clap::{arg, crate_version, Command};
use lzjs_rs::Options;

const RCH: &str = "unreachable was reached";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let long_help = "Examples:
---------
Compress:        `lzjs-rs compress -i my_text -o my_text.lzjs`
Expand:          `lzjs-rs expand -i my_text.lzjs -o my_text`
Base64 compress: `lzjs-rs base64-compress -i my_text -o my_text.b64`";

    let mut main_cmd = Command::new("lzjs-rs")
        .about("Compress and expand text with a heuristic LZSS/LZW dispatcher")
        .after_long_help(long_help)
        .version(crate_version!());

    let overrides = || {
        [
            arg!(--"max-bytes" <BYTES> "abort compression past this many bytes")
                .required(false)
                .value_parser(clap::value_parser!(usize)),
            arg!(--"code-start" <CODE> "override the LZW literal/code boundary")
                .required(false)
                .value_parser(clap::value_parser!(u32)),
            arg!(--"code-max" <CODE> "override the LZW dictionary's highest code")
                .required(false)
                .value_parser(clap::value_parser!(u32)),
        ]
    };

    main_cmd = main_cmd.subcommand(
        Command::new("compress")
            .arg(arg!(-i --input <PATH> "input path").required(true))
            .arg(arg!(-o --output <PATH> "output path").required(true))
            .args(overrides())
            .about("compress a UTF-8 text file"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("expand")
            .arg(arg!(-i --input <PATH> "input path").required(true))
            .arg(arg!(-o --output <PATH> "output path").required(true))
            .args(overrides())
            .about("expand a compressed file"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("base64-compress")
            .arg(arg!(-i --input <PATH> "input path").required(true))
            .arg(arg!(-o --output <PATH> "output path").required(true))
            .args(overrides())
            .about("compress a UTF-8 text file and base64-encode the result"),
    );
    main_cmd = main_cmd.subcommand(
        Command::new("base64-expand")
            .arg(arg!(-i --input <PATH> "input path").required(true))
            .arg(arg!(-o --output <PATH> "output path").required(true))
            .args(overrides())
            .about("base64-decode and expand a file"),
    );

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("compress") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let opt = options_from(cmd);
        let text = std::fs::read_to_string(path_in)?;
        std::fs::write(path_out, lzjs_rs::compress_with(&text, &opt))?;
    }

    if let Some(cmd) = matches.subcommand_matches("expand") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let opt = options_from(cmd);
        let text = std::fs::read_to_string(path_in)?;
        std::fs::write(path_out, lzjs_rs::decompress_with(&text, &opt))?;
    }

    if let Some(cmd) = matches.subcommand_matches("base64-compress") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let opt = options_from(cmd);
        let text = std::fs::read_to_string(path_in)?;
        std::fs::write(path_out, lzjs_rs::compress_to_base64_with(&text, &opt))?;
    }

    if let Some(cmd) = matches.subcommand_matches("base64-expand") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let opt = options_from(cmd);
        let text = std::fs::read_to_string(path_in)?;
        std::fs::write(path_out, lzjs_rs::decompress_from_base64_with(&text, &opt))?;
    }

    Ok(())
}

/// Builds dispatcher [`Options`] from the `--max-bytes`/`--code-start`/
/// `--code-max` flags shared by every subcommand. Unset flags leave the
/// corresponding override at `None`, so the dispatcher falls back to its
/// usual auto-derived values.
fn options_from(cmd: &clap::ArgMatches) -> Options {
    Options {
        max_bytes: cmd.get_one::<usize>("max-bytes").copied(),
        lzw_code_start: cmd.get_one::<u32>("code-start").copied(),
        lzw_code_max: cmd.get_one::<u32>("code-max").copied(),
        ..Default::default()
    }
}
