use serde::Serialize;
use tabled::Tabled;

use crate::error::Result;
use crate::output::{self, Format};

#[derive(Debug, Tabled, Serialize)]
struct VersionRow {
    name: &'static str,
    version: &'static str,
}

fn current() -> VersionRow {
    VersionRow {
        name: "conoha",
        version: env!("CARGO_PKG_VERSION"),
    }
}

pub fn run(format: Format) -> Result<()> {
    let info = current();
    match format {
        Format::Table => println!("{} {}", info.name, info.version),
        Format::Json => output::render(format, &[info])?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_matches_package() {
        let info = current();
        assert_eq!(info.name, "conoha");
        assert!(!info.version.is_empty());
    }
}
