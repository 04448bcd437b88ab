use std::process;

fn main() {
    match md2gdoc_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("md2gdoc error: {err:#}");
            process::exit(md2gdoc_cli::exit_code_for(&err) as i32);
        }
    }
}
