//! Codecs for compound string fields of a container config.
//!
//! Several settings pack structured data into one string:
//! - `dxwrapperConfig` / `graphicsDriverConfig`: `key=value` pairs joined by `,`
//! - `envVars`: `NAME=value` tokens joined by spaces
//! - `drives`: `<letter>:<path>` entries concatenated without separators
//! - `cpuList` / `cpuListWoW64`: core indices joined by `,`

use indexmap::IndexMap;

/// Parse a comma-separated `key=value` list. Pairs without `=` or with an
/// empty key are dropped; a repeated key keeps its first position.
pub fn parse_kv(input: &str) -> IndexMap<String, String> {
    let mut pairs = IndexMap::new();
    for pair in input.split(',') {
        if let Some((key, value)) = pair.split_once('=') {
            let key = key.trim();
            if !key.is_empty() {
                pairs.insert(key.to_string(), value.trim().to_string());
            }
        }
    }
    pairs
}

pub fn stringify_kv(pairs: &IndexMap<String, String>) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(",")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

/// Parse space-separated `NAME=value` tokens; tokens without `=` are ignored.
pub fn parse_env(input: &str) -> Vec<EnvVar> {
    input
        .split(' ')
        .filter_map(|token| token.split_once('='))
        .map(|(name, value)| EnvVar {
            name: name.to_string(),
            value: value.to_string(),
        })
        .collect()
}

pub fn stringify_env(vars: &[EnvVar]) -> String {
    vars.iter()
        .map(|v| format!("{}={}", v.name, v.value))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveMapping {
    pub letter: String,
    pub path: String,
}

/// Parse concatenated drive mappings such as `C:/sdcard/CD:/data/D`.
///
/// Every `:` starts a drive: its letter is the character before it, and its
/// path runs up to the character before the next `:`.
pub fn parse_drives(input: &str) -> Vec<DriveMapping> {
    let chars: Vec<char> = input.chars().collect();
    let colons: Vec<usize> = chars
        .iter()
        .enumerate()
        .filter(|(_, c)| **c == ':')
        .map(|(i, _)| i)
        .collect();

    colons
        .iter()
        .enumerate()
        .map(|(n, &colon)| {
            let letter = colon
                .checked_sub(1)
                .map(|i| chars[i].to_string())
                .unwrap_or_default();
            let start = colon + 1;
            let end = match colons.get(n + 1) {
                Some(&next) => next.saturating_sub(1).max(start),
                None => chars.len(),
            };
            DriveMapping {
                letter,
                path: chars[start..end].iter().collect(),
            }
        })
        .collect()
}

pub fn stringify_drives(drives: &[DriveMapping]) -> String {
    drives
        .iter()
        .map(|d| format!("{}:{}", d.letter, d.path))
        .collect()
}

/// Parse a comma-separated core list, dropping entries that are not numbers.
pub fn parse_cpu_list(input: &str) -> Vec<u32> {
    input
        .split(',')
        .filter_map(|core| core.trim().parse().ok())
        .collect()
}

/// Add or remove one core and return the list sorted ascending.
pub fn toggle_core(input: &str, core: u32) -> String {
    let mut cores = parse_cpu_list(input);
    if let Some(pos) = cores.iter().position(|&c| c == core) {
        cores.remove(pos);
    } else {
        cores.push(core);
    }
    cores.sort_unstable();
    cores
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kv() {
        let pairs = parse_kv("renderer=opengl, gpuName = Adreno 650 ,broken,=x,csmt=3");
        let expected: Vec<(&str, &str)> = vec![
            ("renderer", "opengl"),
            ("gpuName", "Adreno 650"),
            ("csmt", "3"),
        ];
        let actual: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(actual, expected);
        assert_eq!(stringify_kv(&pairs), "renderer=opengl,gpuName=Adreno 650,csmt=3");
    }

    #[test]
    fn test_parse_kv_value_keeps_extra_equals() {
        let pairs = parse_kv("args=-a=1");
        assert_eq!(pairs["args"], "-a=1");
    }

    #[test]
    fn test_parse_env() {
        let vars = parse_env("WINEDEBUG=-all  DXVK_HUD=fps,memory BOGUS MESA=a=b");
        assert_eq!(vars.len(), 3);
        assert_eq!(vars[0], EnvVar { name: "WINEDEBUG".into(), value: "-all".into() });
        assert_eq!(vars[2], EnvVar { name: "MESA".into(), value: "a=b".into() });
        assert_eq!(stringify_env(&vars), "WINEDEBUG=-all DXVK_HUD=fps,memory MESA=a=b");
    }

    #[test]
    fn test_parse_drives() {
        let drives = parse_drives("C:/sdcard/CD:/data/D");
        assert_eq!(
            drives,
            vec![
                DriveMapping { letter: "C".into(), path: "/sdcard/C".into() },
                DriveMapping { letter: "D".into(), path: "/data/D".into() },
            ]
        );
        assert_eq!(stringify_drives(&drives), "C:/sdcard/CD:/data/D");
    }

    #[test]
    fn test_parse_drives_empty() {
        assert!(parse_drives("").is_empty());
        assert!(parse_drives("no drives").is_empty());
    }

    #[test]
    fn test_cpu_list() {
        assert_eq!(parse_cpu_list("0,1,,3,x"), vec![0, 1, 3]);
        assert_eq!(toggle_core("0,1,3", 2), "0,1,2,3");
        assert_eq!(toggle_core("3,1,0", 1), "0,3");
        assert_eq!(toggle_core("", 5), "5");
    }
}
