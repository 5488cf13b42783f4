//! [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode):
//! choosing the document mode from a DOCTYPE token.

use arbor_dom::QuirksMode;

/// "The public identifier is set to: ..." exact matches that force quirks mode.
const QUIRKY_PUBLIC_IDS: &[&str] = &[
    "-//w3o//dtd w3 html strict 3.0//en//",
    "-/w3c/dtd html 4.0 transitional/en",
    "html",
];

/// "The public identifier starts with: ..." prefixes that force quirks mode.
const QUIRKY_PUBLIC_PREFIXES: &[&str] = &[
    "+//silmaril//dtd html pro v0r11 19970101//",
    "-//as//dtd html 3.0 aswedit + extensions//",
    "-//advasoft ltd//dtd html 3.0 aswedit + extensions//",
    "-//ietf//dtd html 2.0 level 1//",
    "-//ietf//dtd html 2.0 level 2//",
    "-//ietf//dtd html 2.0 strict level 1//",
    "-//ietf//dtd html 2.0 strict level 2//",
    "-//ietf//dtd html 2.0 strict//",
    "-//ietf//dtd html 2.0//",
    "-//ietf//dtd html 2.1e//",
    "-//ietf//dtd html 3.0//",
    "-//ietf//dtd html 3.2 final//",
    "-//ietf//dtd html 3.2//",
    "-//ietf//dtd html 3//",
    "-//ietf//dtd html level 0//",
    "-//ietf//dtd html level 1//",
    "-//ietf//dtd html level 2//",
    "-//ietf//dtd html level 3//",
    "-//ietf//dtd html strict level 0//",
    "-//ietf//dtd html strict level 1//",
    "-//ietf//dtd html strict level 2//",
    "-//ietf//dtd html strict level 3//",
    "-//ietf//dtd html strict//",
    "-//ietf//dtd html//",
    "-//metrius//dtd metrius presentational//",
    "-//microsoft//dtd internet explorer 2.0 html strict//",
    "-//microsoft//dtd internet explorer 2.0 html//",
    "-//microsoft//dtd internet explorer 2.0 tables//",
    "-//microsoft//dtd internet explorer 3.0 html strict//",
    "-//microsoft//dtd internet explorer 3.0 html//",
    "-//microsoft//dtd internet explorer 3.0 tables//",
    "-//netscape comm. corp.//dtd html//",
    "-//netscape comm. corp.//dtd strict html//",
    "-//o'reilly and associates//dtd html 2.0//",
    "-//o'reilly and associates//dtd html extended 1.0//",
    "-//o'reilly and associates//dtd html extended relaxed 1.0//",
    "-//sq//dtd html 2.0 hotmetal + extensions//",
    "-//softquad software//dtd hotmetal pro 6.0::19990601::extensions to html 4.0//",
    "-//softquad//dtd hotmetal pro 4.0::19971010::extensions to html 4.0//",
    "-//spyglass//dtd html 2.0 extended//",
    "-//sun microsystems corp.//dtd hotjava html//",
    "-//sun microsystems corp.//dtd hotjava strict html//",
    "-//w3c//dtd html 3 1995-03-24//",
    "-//w3c//dtd html 3.2 draft//",
    "-//w3c//dtd html 3.2 final//",
    "-//w3c//dtd html 3.2//",
    "-//w3c//dtd html 3.2s draft//",
    "-//w3c//dtd html 4.0 frameset//",
    "-//w3c//dtd html 4.0 transitional//",
    "-//w3c//dtd html experimental 19960712//",
    "-//w3c//dtd html experimental 970421//",
    "-//w3c//dtd w3 html//",
    "-//w3o//dtd w3 html 3.0//",
    "-//webtechs//dtd mozilla html 2.0//",
    "-//webtechs//dtd mozilla html//",
];

/// HTML 4.01 frameset/transitional prefixes: quirks without a system
/// identifier, limited quirks with one.
const HTML401_LOOSE_PREFIXES: &[&str] = &[
    "-//w3c//dtd html 4.01 frameset//",
    "-//w3c//dtd html 4.01 transitional//",
];

/// XHTML 1.0 frameset/transitional prefixes: always limited quirks.
const XHTML_LOOSE_PREFIXES: &[&str] = &[
    "-//w3c//dtd xhtml 1.0 frameset//",
    "-//w3c//dtd xhtml 1.0 transitional//",
];

const QUIRKY_SYSTEM_ID: &str = "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd";

fn starts_with_any(value: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|prefix| value.starts_with(prefix))
}

/// The document mode a DOCTYPE token selects.
///
/// Identifiers are compared ASCII case-insensitively. `None` means the
/// identifier was missing, which differs from an empty one.
#[must_use]
pub fn quirks_mode_for_doctype(
    name: Option<&str>,
    public_id: Option<&str>,
    system_id: Option<&str>,
    force_quirks: bool,
) -> QuirksMode {
    let public = public_id.map(str::to_ascii_lowercase);
    let system = system_id.map(str::to_ascii_lowercase);
    let public = public.as_deref();

    // "the force-quirks flag is set to on"
    // "the name is not "html""
    if force_quirks || name != Some("html") {
        return QuirksMode::Quirks;
    }

    if let Some(public) = public {
        if QUIRKY_PUBLIC_IDS.contains(&public) || starts_with_any(public, QUIRKY_PUBLIC_PREFIXES) {
            return QuirksMode::Quirks;
        }
        // "The system identifier is missing and the public identifier starts with..."
        if system.is_none() && starts_with_any(public, HTML401_LOOSE_PREFIXES) {
            return QuirksMode::Quirks;
        }
    }

    // "The system identifier is set to: "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd""
    if system.as_deref() == Some(QUIRKY_SYSTEM_ID) {
        return QuirksMode::Quirks;
    }

    if let Some(public) = public
        && (starts_with_any(public, XHTML_LOOSE_PREFIXES)
            || (system.is_some() && starts_with_any(public, HTML401_LOOSE_PREFIXES)))
    {
        return QuirksMode::LimitedQuirks;
    }

    QuirksMode::NoQuirks
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(Some("html"), None, None, false => QuirksMode::NoQuirks; "html5 doctype")]
    #[test_case(Some("html"), None, None, true => QuirksMode::Quirks; "force quirks")]
    #[test_case(None, None, None, false => QuirksMode::Quirks; "missing name")]
    #[test_case(Some("svg"), None, None, false => QuirksMode::Quirks; "wrong name")]
    #[test_case(Some("html"), Some("-//W3C//DTD HTML 4.0 Transitional//EN"), None, false => QuirksMode::Quirks; "html4 transitional")]
    #[test_case(Some("html"), Some("-//W3C//DTD HTML 4.01 Transitional//EN"), None, false => QuirksMode::Quirks; "html401 transitional without system id")]
    #[test_case(Some("html"), Some("-//W3C//DTD HTML 4.01 Transitional//EN"), Some("http://www.w3.org/TR/html4/loose.dtd"), false => QuirksMode::LimitedQuirks; "html401 transitional with system id")]
    #[test_case(Some("html"), Some("-//W3C//DTD XHTML 1.0 Transitional//EN"), None, false => QuirksMode::LimitedQuirks; "xhtml transitional")]
    #[test_case(Some("html"), Some("-//W3C//DTD HTML 4.01//EN"), Some("http://www.w3.org/TR/html4/strict.dtd"), false => QuirksMode::NoQuirks; "html401 strict")]
    #[test_case(Some("html"), None, Some("http://www.ibm.com/data/dtd/v11/IBMXHTML1-transitional.dtd"), false => QuirksMode::Quirks; "ibm system id")]
    fn doctype_modes(
        name: Option<&str>,
        public: Option<&str>,
        system: Option<&str>,
        force: bool,
    ) -> QuirksMode {
        quirks_mode_for_doctype(name, public, system, force)
    }
}
