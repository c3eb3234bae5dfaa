/*
 * A small in-memory model of Windows profile (INI) files: `[Section]` headers
 * followed by `key=value` lines. Section and key lookups ignore ASCII case,
 * the way GetPrivateProfileString does. Comments (`;` or `#`) and blank lines
 * are dropped on parse; writing uses CRLF line endings.
 */
use std::fmt;
use std::path::{Path, PathBuf};

pub const PROFILE_EXTENSION: &str = "ini";

#[derive(Debug, Clone, PartialEq, Default)]
struct IniSection {
    name: String,
    entries: Vec<(String, String)>,
}

impl IniSection {
    fn entry(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

impl IniDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /*
     * Lenient parse: lines before the first header and lines without `=` are
     * ignored (with a trace), duplicate sections are merged, and the last
     * duplicate key wins.
     */
    pub fn parse(input: &str) -> Self {
        let mut document = Self::new();
        let mut current: Option<String> = None;
        for (number, raw) in input.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim().to_string();
                document.section_mut(&name);
                current = Some(name);
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                log::trace!("Profile: line {} has no '=': {line}", number + 1);
                continue;
            };
            match &current {
                Some(section) => document.set(section, key.trim(), value.trim()),
                None => log::trace!("Profile: line {} precedes any section", number + 1),
            }
        }
        document
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.entry(key)
    }

    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let section = self.section_mut(section);
        match section
            .entries
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
        {
            Some((_, existing)) => *existing = value.to_string(),
            None => section.entries.push((key.to_string(), value.to_string())),
        }
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.section(section).is_some()
    }

    #[cfg(test)]
    fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    fn section_mut(&mut self, name: &str) -> &mut IniSection {
        let index = match self
            .sections
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(name))
        {
            Some(index) => index,
            None => {
                self.sections.push(IniSection {
                    name: name.to_string(),
                    entries: Vec::new(),
                });
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                write!(f, "\r\n")?;
            }
            write!(f, "[{}]\r\n", section.name)?;
            for (key, value) in &section.entries {
                write!(f, "{key}={value}\r\n")?;
            }
        }
        Ok(())
    }
}

/// Escapes characters that would break a single-line profile value.
pub fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn unescape_value(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => unescaped.push('\n'),
            Some('r') => unescaped.push('\r'),
            Some('\\') => unescaped.push('\\'),
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }
    unescaped
}

/*
 * Target path for a save: the extension is forced to `.ini` and relative
 * names are placed in `data_folder`.
 */
pub fn save_path(name: &Path, data_folder: &Path) -> PathBuf {
    let mut path = resolve(name, data_folder);
    if !has_profile_extension(&path) {
        path.set_extension(PROFILE_EXTENSION);
    }
    path
}

/// Source path for a load, resolved the same way as for a save.
pub fn load_path(name: &Path, data_folder: &Path) -> PathBuf {
    resolve(name, data_folder)
}

pub fn has_profile_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(PROFILE_EXTENSION))
}

fn resolve(name: &Path, data_folder: &Path) -> PathBuf {
    if name.is_absolute() {
        name.to_path_buf()
    } else {
        data_folder.join(name)
    }
}
