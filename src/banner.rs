// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    let banner = r#"
 _       _
(_)_ __ | | ___ __  _ __ ___  ___ ___
| | '_ \| |/ / '_ \| '__/ _ \/ __/ __|
| | | | |   <| |_) | | |  __/\__ \__ \
|_|_| |_|_|\_\ .__/|_|  \___||___/___/
             |_|

    Script to PDF Conversion Service
"#;
    println!("{}", banner);
}
