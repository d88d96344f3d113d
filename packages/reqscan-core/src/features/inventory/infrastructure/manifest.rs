//! Distribution metadata and file-manifest parsing
//!
//! Shared by the site-packages and conda inventories. Exported import names
//! always come from what the distribution actually installed.

use std::collections::BTreeSet;

/// `Name` and `Version` headers of a METADATA / PKG-INFO file
pub fn parse_metadata(text: &str) -> (Option<String>, Option<String>) {
    let mut name = None;
    let mut version = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            break;
        }
        if let Some((key, value)) = line.split_once(':') {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.trim() {
                "Name" if name.is_none() => name = Some(value.to_string()),
                "Version" if version.is_none() => version = Some(value.to_string()),
                _ => {}
            }
        }
        if name.is_some() && version.is_some() {
            break;
        }
    }

    (name, version)
}

/// `name-version` from a `.dist-info` / `.egg-info` directory name
pub fn split_dist_dir_name(dir_name: &str) -> Option<(String, Option<String>)> {
    let stem = dir_name
        .strip_suffix(".dist-info")
        .or_else(|| dir_name.strip_suffix(".egg-info"))?;
    match stem.split_once('-') {
        Some((name, rest)) => {
            let version = rest.split('-').next().unwrap_or(rest);
            Some((name.to_string(), Some(version.to_string())))
        }
        None => Some((stem.to_string(), None)),
    }
}

/// Names listed in `top_level.txt`
pub fn exports_from_top_level(text: &str) -> BTreeSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.split(['/', '\\']).next())
        .filter(|name| is_identifier(name))
        .map(str::to_string)
        .collect()
}

/// Top-level names from `RECORD` (CSV, path in the first column)
pub fn exports_from_record(text: &str) -> BTreeSet<String> {
    text.lines()
        .filter_map(record_path)
        .filter_map(|path| top_level_name(&path))
        .collect()
}

/// Top-level names from an egg's `installed-files.txt`
///
/// Paths are relative to the `.egg-info` directory; only entries that leave
/// it (`../`) describe installed modules.
pub fn exports_from_installed_files(text: &str) -> BTreeSet<String> {
    text.lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix("../"))
        .filter_map(top_level_name)
        .collect()
}

/// Top-level names from paths relative to a site-packages directory
pub fn exports_from_paths<'a, I>(paths: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    paths.into_iter().filter_map(top_level_name).collect()
}

fn record_path(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if let Some(quoted) = line.strip_prefix('"') {
        let end = quoted.find('"')?;
        return Some(quoted[..end].to_string());
    }
    Some(line.split(',').next().unwrap_or(line).to_string())
}

/// Import name provided by one installed file, if any
fn top_level_name(path: &str) -> Option<String> {
    let path = path.trim().replace('\\', "/");
    let mut segments = path.split('/').filter(|s| !s.is_empty() && *s != ".");
    let first = segments.next()?;
    let is_dir = segments.next().is_some();

    if first == ".." || first == "__pycache__" || first.starts_with('.') {
        return None;
    }

    let name = if is_dir {
        if [".dist-info", ".egg-info", ".data", ".libs"]
            .iter()
            .any(|suffix| first.ends_with(suffix))
        {
            return None;
        }
        first
    } else if let Some(stem) = first.strip_suffix(".py") {
        stem
    } else if first.ends_with(".so") || first.ends_with(".pyd") {
        first.split('.').next()?
    } else {
        return None;
    };

    is_identifier(name).then(|| name.to_string())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata() {
        let text = "Metadata-Version: 2.1\nName: Pillow\nVersion: 10.0.1\nSummary: x\n\nName: NotThis\n";
        assert_eq!(
            parse_metadata(text),
            (Some("Pillow".to_string()), Some("10.0.1".to_string()))
        );
    }

    #[test]
    fn test_split_dist_dir_name() {
        assert_eq!(
            split_dist_dir_name("typing_extensions-4.8.0.dist-info"),
            Some(("typing_extensions".to_string(), Some("4.8.0".to_string())))
        );
        assert_eq!(
            split_dist_dir_name("six-1.16.0-py3.11.egg-info"),
            Some(("six".to_string(), Some("1.16.0".to_string())))
        );
        assert_eq!(split_dist_dir_name("requests"), None);
    }

    #[test]
    fn test_exports_from_record() {
        let record = "\
PIL/__init__.py,sha256=abc,123
PIL/Image.py,sha256=abc,456
Pillow-10.0.1.dist-info/METADATA,sha256=abc,789
Pillow.libs/libjpeg.so,sha256=abc,1
../../bin/pilfile,,
__pycache__/x.cpython-311.pyc,,
six.py,sha256=abc,1
_cffi_backend.cpython-311-x86_64-linux-gnu.so,,
\"weird,name/__init__.py\",,
distutils-precedence.pth,,
";
        let exports = exports_from_record(record);
        let names: Vec<_> = exports.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["PIL", "_cffi_backend", "six"]);
    }

    #[test]
    fn test_exports_from_top_level_and_installed_files() {
        let top = exports_from_top_level("yaml\n_yaml\n\n");
        assert!(top.contains("yaml") && top.contains("_yaml"));

        let installed = exports_from_installed_files("../dateutil/__init__.py\n../dateutil/tz.py\nPKG-INFO\n");
        assert_eq!(installed.into_iter().collect::<Vec<_>>(), vec!["dateutil"]);
    }
}
