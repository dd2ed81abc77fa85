//! Licenses of the projects the modloader is built on or talks to.

/// One third-party (or own) license entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct License {
    pub name: &'static str,
    pub owner: &'static str,
    pub kind: &'static str,
    pub url: &'static str,
    copyright: &'static str,
}

const MIT_BODY: &[&str] = &[
    "Permission is hereby granted, free of charge, to any person obtaining a copy",
    "of this software and associated documentation files (the \"Software\"), to deal",
    "in the Software without restriction, including without limitation the rights",
    "to use, copy, modify, merge, publish, distribute, sublicense, and/or sell",
    "copies of the Software, and to permit persons to whom the Software is",
    "furnished to do so, subject to the following conditions:",
    "",
    "The above copyright notice and this permission notice shall be included in all",
    "copies or substantial portions of the Software.",
    "",
    "THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR",
    "IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,",
    "FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE",
    "AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER",
    "LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,",
    "OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE",
    "SOFTWARE.",
];

const MIT: &str = "MIT License";

static LICENSES: &[License] = &[
    License {
        name: "Kliko's modloader",
        owner: "TheKliko",
        kind: MIT,
        url: "https://github.com/TheKliko/klikos-modloader/",
        copyright: "Copyright (c) 2024 TheKliko",
    },
    License {
        name: "Kliko's mod updater",
        owner: "TheKliko",
        kind: MIT,
        url: "https://github.com/TheKliko/klikos-modding-tool/",
        copyright: "Copyright (c) 2024 TheKliko",
    },
    License {
        name: "customtkinter",
        owner: "Tom Schimansky",
        kind: MIT,
        url: "https://customtkinter.tomschimansky.com/",
        copyright: "Copyright (c) 2023 Tom Schimansky",
    },
    License {
        name: "pypresence",
        owner: "qwertyquerty",
        kind: MIT,
        url: "https://github.com/qwertyquerty/pypresence/",
        copyright: "Copyright (c) 2022 qwertyquerty",
    },
    License {
        name: "BloxstrapRPC SDK",
        owner: "pizzaboxer",
        kind: MIT,
        url: "https://github.com/pizzaboxer/bloxstrap/wiki/Integrating-Bloxstrap-functionality-into-your-game",
        copyright: "Copyright (c) 2023 pizzaboxer",
    },
];

impl License {
    /// Full license text, one entry per line as it should be displayed.
    pub fn text_lines(&self) -> Vec<&'static str> {
        let mut lines = vec![self.kind, "", self.copyright, ""];
        lines.extend_from_slice(MIT_BODY);
        lines
    }
}

pub fn all() -> &'static [License] {
    LICENSES
}

/// Exact-name lookup.
pub fn get(name: &str) -> Option<&'static License> {
    LICENSES.iter().find(|license| license.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_exact_name() {
        let license = get("pypresence").unwrap();
        assert_eq!(license.owner, "qwertyquerty");
        assert_eq!(license.kind, "MIT License");
        assert!(get("PyPresence").is_none());
        assert!(get("unknown").is_none());
    }

    #[test]
    fn test_text_lines() {
        let lines = get("customtkinter").unwrap().text_lines();
        assert_eq!(lines[0], "MIT License");
        assert_eq!(lines[2], "Copyright (c) 2023 Tom Schimansky");
        assert_eq!(lines.last(), Some(&"SOFTWARE."));
        assert_eq!(lines.len(), 4 + MIT_BODY.len());
    }

    #[test]
    fn test_registry_names_are_unique() {
        let names: std::collections::HashSet<_> = all().iter().map(|l| l.name).collect();
        assert_eq!(names.len(), all().len());
        assert_eq!(all().len(), 5);
    }
}
