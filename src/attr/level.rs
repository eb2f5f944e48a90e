//! Record severity.
//!
//! Levels are plain integers; the four named ones leave gaps so callers can
//! define levels in between. Text form is the nearest lower named level plus
//! an offset, e.g. `INFO+2` or `DEBUG-1`.

use anyhow::{Context, bail};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static LEVEL_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^(?i)(DEBUG|INFO|WARN|ERROR)([+-]\d+)?$"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(pub i32);

impl Level {
    pub const DEBUG: Level = Level(-4);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(4);
    pub const ERROR: Level = Level(8);
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (base, named) = if *self < Level::INFO {
            ("DEBUG", Level::DEBUG)
        } else if *self < Level::WARN {
            ("INFO", Level::INFO)
        } else if *self < Level::ERROR {
            ("WARN", Level::WARN)
        } else {
            ("ERROR", Level::ERROR)
        };
        let offset = self.0 - named.0;
        if offset == 0 {
            f.write_str(base)
        } else {
            write!(f, "{}{:+}", base, offset)
        }
    }
}

impl FromStr for Level {
    type Err = anyhow::Error;

    /// Parse the text form produced by `Display`. Names are case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let re = LEVEL_RE.as_ref().map_err(Clone::clone)?;
        let caps = match re.captures(s.trim()) {
            Some(c) => c,
            None => bail!("unknown level name: {:?}", s),
        };

        let base = match caps[1].to_ascii_uppercase().as_str() {
            "DEBUG" => Level::DEBUG,
            "INFO" => Level::INFO,
            "WARN" => Level::WARN,
            _ => Level::ERROR,
        };
        let offset: i32 = match caps.get(2) {
            Some(m) => m
                .as_str()
                .parse()
                .with_context(|| format!("bad level offset in {:?}", s))?,
            None => 0,
        };
        match base.0.checked_add(offset) {
            Some(n) => Ok(Level(n)),
            None => bail!("level offset out of range in {:?}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_named_and_offsets() {
        assert_eq!(Level::DEBUG.to_string(), "DEBUG");
        assert_eq!(Level::INFO.to_string(), "INFO");
        assert_eq!(Level::WARN.to_string(), "WARN");
        assert_eq!(Level::ERROR.to_string(), "ERROR");
        assert_eq!(Level(2).to_string(), "INFO+2");
        assert_eq!(Level(-5).to_string(), "DEBUG-1");
        assert_eq!(Level(9).to_string(), "ERROR+1");
    }

    #[test]
    fn parse_round_trips_display() {
        for lvl in [Level::DEBUG, Level::INFO, Level(3), Level::WARN, Level(-6), Level(12)] {
            assert_eq!(lvl.to_string().parse::<Level>().unwrap(), lvl);
        }
        assert_eq!("warn".parse::<Level>().unwrap(), Level::WARN);
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert!("TRACE".parse::<Level>().is_err());
        assert!("INFO+".parse::<Level>().is_err());
    }

    #[test]
    fn parse_rejects_out_of_range_offsets() {
        for s in ["ERROR+2147483647", "DEBUG-2147483647", "INFO+99999999999"] {
            assert!(s.parse::<Level>().is_err(), "accepted {s}");
        }
        assert_eq!("INFO+2147483647".parse::<Level>().unwrap(), Level(i32::MAX));
        assert_eq!("DEBUG-2147483644".parse::<Level>().unwrap(), Level(i32::MIN));
    }

    #[test]
    fn default_is_info() {
        assert_eq!(Level::default(), Level::INFO);
    }
}
