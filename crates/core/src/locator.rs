//! Symbolic locator parsing.
//!
//! Translates a symbolic locator string into a [`LocatorSpec`]: an
//! explicit `strategy=argument` prefix, an unprefixed XPath (recognized by
//! its leading path token, parenthesized or not), or the legacy fallback
//! of treating anything else as a literal tag-name search. Pure functions;
//! no endpoint interaction.

use std::sync::LazyLock;

use drover_protocol::{LocatorSpec, Strategy};
use regex::Regex;
use tracing::warn;

use crate::error::{Error, Result};

/// Explicit prefixes, matched case-sensitively. Each consumes the rest of
/// the input as the strategy argument.
const PREFIXES: &[(&str, Strategy)] = &[
	("id=", Strategy::Id),
	("class=", Strategy::Class),
	("name=", Strategy::Name),
	("css=", Strategy::Css),
	("link=", Strategy::LinkText),
	("partialLinkText=", Strategy::PartialLinkText),
	("partial=", Strategy::PartialLinkText),
	("xpath=", Strategy::XPath),
	("tag=", Strategy::Tag),
];

/// Dot-relative XPath prefix, optionally inside parentheses. Some
/// endpoints reject `.//x` even though it is syntactically valid; the
/// rewrite strips the leading dot to the absolute form they accept.
static DOT_RELATIVE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\(*)\.(/.*)$").expect("dot-relative pattern"));

/// Parses a symbolic locator, rewriting dot-relative XPath to the
/// absolute form.
///
/// An input with no recognized prefix and no leading path token falls
/// back to a literal tag-name search. That default is preserved from the
/// behavior automation scripts already rely on; a typo in a prefix
/// (`dc=...`) therefore becomes a tag search rather than an error, which
/// is why the fallback is logged.
pub fn parse(input: &str) -> Result<LocatorSpec> {
	parse_inner(input, false)
}

/// Parses a symbolic locator without the absolute-path rewrite, for call
/// sites that intentionally pass expressions relative to an
/// already-resolved element.
pub fn parse_relative(input: &str) -> Result<LocatorSpec> {
	parse_inner(input, true)
}

fn parse_inner(input: &str, allow_relative: bool) -> Result<LocatorSpec> {
	if input.trim().is_empty() {
		return Err(Error::LocatorSyntax("blank locator".to_string()));
	}

	for (prefix, strategy) in PREFIXES {
		if let Some(argument) = input.strip_prefix(prefix) {
			if argument.is_empty() {
				return Err(Error::LocatorSyntax(format!("empty argument after {prefix}")));
			}
			let argument = if *strategy == Strategy::XPath && !allow_relative {
				normalize_xpath(argument)
			} else {
				argument.to_string()
			};
			return Ok(LocatorSpec::new(*strategy, argument));
		}
	}

	if looks_like_xpath(input) {
		let argument = if allow_relative {
			input.to_string()
		} else {
			normalize_xpath(input)
		};
		return Ok(LocatorSpec::new(Strategy::XPath, argument));
	}

	warn!(target = "drover.locator", locator = %input, "no prefix and not path-like; treating as tag name");
	Ok(LocatorSpec::new(Strategy::Tag, input))
}

/// True when the input reads as an XPath once leading parentheses are
/// stripped: `/...`, `./...`, `(//a)[1]`, `(./a)[1]`.
fn looks_like_xpath(input: &str) -> bool {
	let inner = input.trim_start_matches('(');
	inner.starts_with('/') || inner.starts_with("./")
}

/// Rewrites a leading dot-relative segment (inside or outside
/// parentheses) to the absolute form: `.//div` becomes `//div`,
/// `(./a)[2]` becomes `(/a)[2]`. Anything else passes through unchanged.
fn normalize_xpath(path: &str) -> String {
	DOT_RELATIVE.replace(path, "$1$2").into_owned()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn explicit_prefixes_select_strategies() {
		let spec = parse("css=#login").unwrap();
		assert_eq!(spec, LocatorSpec::new(Strategy::Css, "#login"));

		assert_eq!(parse("id=main").unwrap().strategy, Strategy::Id);
		assert_eq!(parse("class=btn-primary").unwrap().strategy, Strategy::Class);
		assert_eq!(parse("name=email").unwrap().strategy, Strategy::Name);
		assert_eq!(parse("link=Sign in").unwrap().strategy, Strategy::LinkText);
		assert_eq!(parse("tag=input").unwrap().strategy, Strategy::Tag);
	}

	#[test]
	fn both_partial_prefixes_map_to_partial_link_text() {
		assert_eq!(parse("partial=Sign").unwrap(), LocatorSpec::new(Strategy::PartialLinkText, "Sign"));
		assert_eq!(
			parse("partialLinkText=Sign").unwrap(),
			LocatorSpec::new(Strategy::PartialLinkText, "Sign")
		);
	}

	#[test]
	fn prefixes_are_case_sensitive() {
		// "CSS=" is not a recognized prefix, so the legacy fallback kicks in.
		let spec = parse("CSS=#login").unwrap();
		assert_eq!(spec.strategy, Strategy::Tag);
		assert_eq!(spec.argument, "CSS=#login");
	}

	#[test]
	fn argument_may_contain_equals() {
		let spec = parse("css=input[name='q']").unwrap();
		assert_eq!(spec.argument, "input[name='q']");
	}

	#[test]
	fn absolute_xpath_passes_through_unchanged() {
		let spec = parse("//div[@id='x']").unwrap();
		assert_eq!(spec, LocatorSpec::new(Strategy::XPath, "//div[@id='x']"));
	}

	#[test]
	fn dot_relative_xpath_is_rewritten() {
		assert_eq!(parse(".//div").unwrap(), LocatorSpec::new(Strategy::XPath, "//div"));
		assert_eq!(parse("(.//a)[2]").unwrap(), LocatorSpec::new(Strategy::XPath, "(//a)[2]"));
		assert_eq!(parse("((.//a))[2]").unwrap(), LocatorSpec::new(Strategy::XPath, "((//a))[2]"));
	}

	#[test]
	fn explicit_xpath_prefix_also_normalized() {
		assert_eq!(parse("xpath=.//span").unwrap(), LocatorSpec::new(Strategy::XPath, "//span"));
	}

	#[test]
	fn relative_mode_skips_the_rewrite() {
		assert_eq!(parse_relative(".//div").unwrap(), LocatorSpec::new(Strategy::XPath, ".//div"));
		assert_eq!(parse_relative("xpath=./td[1]").unwrap(), LocatorSpec::new(Strategy::XPath, "./td[1]"));
	}

	#[test]
	fn bare_word_falls_back_to_tag() {
		assert_eq!(parse("button").unwrap(), LocatorSpec::new(Strategy::Tag, "button"));
	}

	#[test]
	fn blank_input_is_a_syntax_error() {
		assert!(matches!(parse(""), Err(Error::LocatorSyntax(_))));
		assert!(matches!(parse("   "), Err(Error::LocatorSyntax(_))));
	}

	#[test]
	fn empty_prefix_argument_is_a_syntax_error() {
		assert!(matches!(parse("css="), Err(Error::LocatorSyntax(_))));
	}

	#[test]
	fn parenthesized_absolute_xpath_recognized() {
		let spec = parse("(//a)[1]").unwrap();
		assert_eq!(spec, LocatorSpec::new(Strategy::XPath, "(//a)[1]"));
	}
}
