//! Streaming markup-to-text conversion
//!
//! The extractor consumes the html5ever tokenizer's event stream directly,
//! without building a tree. It tracks a single "current tag": a start tag
//! replaces it, an end tag clears it only when the names match, and a
//! self-closing tag (`<meta/>`) clears it outright. Text seen
//! while the current tag is in [`SKIPPED_TAGS`] is dropped. Nested markup is
//! therefore only filtered one level deep; `<head><p>x</p>` keeps `x`.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

/// Elements whose text never reaches the output
pub const SKIPPED_TAGS: &[&str] = &["style", "script", "meta", "head", "title", "link"];

/// Extracts the visible text blocks of a document
///
/// Each non-blank run of character data is trimmed and emitted in document
/// order; blocks are joined with newlines. Malformed markup never fails,
/// it only changes which blocks are emitted.
///
/// # Examples
///
/// ```
/// use shoal::extract_text;
///
/// let text = extract_text("<html><head><title>T</title></head><body><p>Hi</p><script>x()</script>there</body></html>");
/// assert_eq!(text, "Hi\nthere");
/// ```
pub fn extract_text(markup: &str) -> String {
    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from_slice(markup));

    let mut tokenizer = Tokenizer::new(TextSink::default(), TokenizerOpts::default());
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();

    tokenizer.sink.blocks.join("\n")
}

/// Token sink that accumulates visible text blocks
#[derive(Debug, Default)]
struct TextSink {
    /// Name of the most recently opened element, if still open
    current_tag: Option<String>,

    /// Character data seen since the last non-character token
    pending: String,

    /// Emitted text blocks
    blocks: Vec<String>,
}

impl TextSink {
    fn is_skipping(&self) -> bool {
        self.current_tag
            .as_deref()
            .map_or(false, |tag| SKIPPED_TAGS.contains(&tag))
    }

    /// Ends the current run of character data
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        if !self.is_skipping() {
            let block = self.pending.trim();
            if !block.is_empty() {
                self.blocks.push(block.to_string());
            }
        }

        self.pending.clear();
    }

    fn handle_tag(&mut self, tag: Tag) -> TokenSinkResult<()> {
        self.flush();

        let name: &str = &tag.name;
        match tag.kind {
            // `<x/>` opens and closes in one token, like a start tag
            // immediately followed by its matching end tag
            TagKind::StartTag if tag.self_closing => {
                self.current_tag = None;
                TokenSinkResult::Continue
            }
            TagKind::StartTag => {
                self.current_tag = Some(name.to_string());

                // Script and style bodies are raw text, not markup
                match name {
                    "script" => TokenSinkResult::RawData(RawKind::ScriptData),
                    "style" => TokenSinkResult::RawData(RawKind::Rawtext),
                    _ => TokenSinkResult::Continue,
                }
            }
            TagKind::EndTag => {
                if self.current_tag.as_deref() == Some(name) {
                    self.current_tag = None;
                }
                TokenSinkResult::Continue
            }
        }
    }
}

impl TokenSink for TextSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(text) => {
                self.pending.push_str(&text);
                TokenSinkResult::Continue
            }
            Token::NullCharacterToken | Token::ParseError(_) => TokenSinkResult::Continue,
            Token::TagToken(tag) => self.handle_tag(tag),
            Token::CommentToken(_) | Token::DoctypeToken(_) | Token::EOFToken => {
                self.flush();
                TokenSinkResult::Continue
            }
        }
    }

    fn end(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_body_dropped() {
        assert_eq!(extract_text("<script>x</script>visible"), "visible");
    }

    #[test]
    fn test_blocks_joined_in_order() {
        let html = "<html><body><h1>Title</h1><p>First</p><p>Second</p></body></html>";
        assert_eq!(extract_text(html), "Title\nFirst\nSecond");
    }

    #[test]
    fn test_blocks_trimmed_and_blank_dropped() {
        let html = "<div>\n   padded   \n</div>\n\n<div>   </div><span>x</span>";
        assert_eq!(extract_text(html), "padded\nx");
    }

    #[test]
    fn test_head_elements_skipped() {
        let html = r#"<html><head><title>Page Title</title><style>body { color: red; }</style>
            <link rel="stylesheet" href="a.css"></head><body><p>Body text</p></body></html>"#;
        assert_eq!(extract_text(html), "Body text");
    }

    #[test]
    fn test_script_with_markup_like_content() {
        let html = "<p>before</p><script>if (a < b && c > d) { document.write('<p>no</p>'); }</script><p>after</p>";
        assert_eq!(extract_text(html), "before\nafter");
    }

    #[test]
    fn test_style_with_markup_like_content() {
        let html = "<style>a > b { content: '<i>'; }</style><b>bold</b>";
        assert_eq!(extract_text(html), "bold");
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(extract_text("<p>Fish &amp; Chips &lt;3</p>"), "Fish & Chips <3");
    }

    #[test]
    fn test_comment_splits_blocks() {
        assert_eq!(extract_text("<p>one<!-- hidden -->two</p>"), "one\ntwo");
    }

    #[test]
    fn test_inline_tags_split_blocks() {
        assert_eq!(extract_text("<p>Hello <b>big</b> world</p>"), "Hello\nbig\nworld");
    }

    #[test]
    fn test_single_level_tracking() {
        // The head is no longer "current" once a child opens
        assert_eq!(extract_text("<head><p>leak</p></head>"), "leak");
        // Text after a child closes belongs to no tag and is kept
        assert_eq!(extract_text("<title><b>x</b>tail</title>"), "x\ntail");
    }

    #[test]
    fn test_mismatched_end_tag_keeps_current() {
        assert_eq!(extract_text("<script>a</p>b</script>c"), "c");
        assert_eq!(extract_text("<title>a</p>b"), "");
    }

    #[test]
    fn test_void_skip_tag_hides_following_text() {
        // <meta> never closes, so text up to the next tag is dropped
        assert_eq!(extract_text("<meta charset=\"utf-8\">hidden<p>shown</p>"), "shown");
    }

    #[test]
    fn test_self_closing_meta_keeps_following_text() {
        assert_eq!(
            extract_text("<meta charset=\"utf-8\"/>visible<p>x</p>"),
            "visible\nx"
        );
    }

    #[test]
    fn test_self_closing_link_keeps_following_text() {
        assert_eq!(extract_text("<link rel=\"x\" href=\"a\"/>visible"), "visible");
    }

    #[test]
    fn test_self_closing_script_keeps_following_text() {
        assert_eq!(extract_text("<script src=\"a.js\"/>visible"), "visible");
    }

    #[test]
    fn test_malformed_markup_does_not_fail() {
        assert_eq!(extract_text("<div><p>unclosed <b>nested"), "unclosed\nnested");
        assert_eq!(extract_text("</div></div>stray"), "stray");
        assert_eq!(extract_text(""), "");
    }

    #[test]
    fn test_plain_text_without_markup() {
        assert_eq!(extract_text("  just text  "), "just text");
    }
}
