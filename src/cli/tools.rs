use std::path::PathBuf;
use crate::harvest::{find_in_path, REQUIRED_TOOLS};

const INSTALL_HINTS: &str = "\
  go install github.com/lc/gau/v2/cmd/gau@latest
  go install github.com/tomnomnom/waybackurls@latest
  go install github.com/hakluke/hakrawler@latest
  export PATH=$PATH:$(go env GOPATH)/bin";

/// Report lines for every required tool and whether all of them resolved.
pub fn tool_report(lookup: impl Fn(&str) -> Option<PathBuf>) -> (Vec<String>, bool) {
    let mut all_ok = true;
    let lines = REQUIRED_TOOLS
        .iter()
        .map(|tool| match lookup(*tool) {
            Some(path) => format!("✅ {} found: {}", tool, path.display()),
            None => {
                all_ok = false;
                format!("❌ {} NOT installed or not in PATH!", tool)
            }
        })
        .collect();
    (lines, all_ok)
}

/// Print the tools check. Returns true when every tool is available.
pub fn handle_tools_check() -> bool {
    println!("[*] Checking required tools in PATH...\n");
    let (lines, all_ok) = tool_report(find_in_path);
    for line in lines {
        println!("{}", line);
    }

    if all_ok {
        println!("\nAll required tools are available, ready to start the scan!");
    } else {
        println!("\n[!] At least one required tool is missing. To install:\n");
        println!("{}", INSTALL_HINTS);
    }
    all_ok
}
