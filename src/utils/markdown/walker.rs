use crate::error::Result;
use pulldown_cmark::{Event, HeadingLevel, LinkType, Parser, Tag, TagEnd};

/// consumer of the section boundaries found in a markdown document, in
/// document order
pub trait DocumentHandler {
    fn on_section_heading(&mut self, level: u8, text: &str) -> Result<()>;
    fn on_list_item(&mut self, text: &str) -> Result<()>;
    fn on_document_end(&mut self) -> Result<()>;
}

#[derive(Debug, Default)]
struct ItemText {
    text: String,
    emitted: bool,
}

#[derive(Debug)]
enum LinkText {
    Inline { dest: String, title: String },
    Auto,
}

struct Walker<'h> {
    handler: &'h mut dyn DocumentHandler,
    heading: Option<(u8, String)>,
    items: Vec<ItemText>,
    links: Vec<LinkText>,
    images: usize,
}

/// walk `source`, reporting headings, list items and the end of the
/// document to `handler`; stops at the first error the handler returns
pub fn walk(source: &str, handler: &mut dyn DocumentHandler) -> Result<()> {
    let mut walker = Walker {
        handler,
        heading: None,
        items: Vec::new(),
        links: Vec::new(),
        images: 0,
    };
    for event in Parser::new(source) {
        walker.event(event)?;
    }
    walker.handler.on_document_end()
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

impl Walker<'_> {
    fn event(&mut self, event: Event<'_>) -> Result<()> {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                self.heading = Some((heading_level(level), String::new()));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = self.heading.take() {
                    self.handler.on_section_heading(level, &text)?;
                }
            }
            Event::Start(Tag::List(_)) => {
                // a nested list ends the text of its parent item
                if let Some(item) = self.items.last_mut()
                    && !item.emitted
                {
                    item.emitted = true;
                    let text = std::mem::take(&mut item.text);
                    self.handler.on_list_item(&text)?;
                }
            }
            Event::Start(Tag::Item) => {
                self.items.push(ItemText::default());
            }
            Event::End(TagEnd::Item) => {
                if let Some(item) = self.items.pop()
                    && !item.emitted
                {
                    self.handler.on_list_item(&item.text)?;
                }
            }
            Event::Start(Tag::Paragraph) => {
                if self.heading.is_none()
                    && let Some(item) = self.items.last_mut()
                    && !item.text.is_empty()
                {
                    item.text.push(' ');
                }
            }
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            }) => match link_type {
                LinkType::Autolink | LinkType::Email => {
                    let mailto = link_type == LinkType::Email
                        && !dest_url.to_lowercase().starts_with("mailto:");
                    let text = format!("<{}{}>", if mailto { "mailto:" } else { "" }, dest_url);
                    self.push_str(&text);
                    self.links.push(LinkText::Auto);
                }
                _ => {
                    self.push_str("[");
                    self.links.push(LinkText::Inline {
                        dest: dest_url.to_string(),
                        title: title.to_string(),
                    });
                }
            },
            Event::End(TagEnd::Link) => {
                if let Some(LinkText::Inline { dest, title }) = self.links.pop() {
                    let text = if title.is_empty() {
                        format!("]({})", dest)
                    } else {
                        format!("]({} \"{}\")", dest, title)
                    };
                    self.push_str(&text);
                }
            }
            Event::Start(Tag::Image { .. }) => self.images += 1,
            Event::End(TagEnd::Image) => self.images = self.images.saturating_sub(1),
            Event::Text(text) | Event::Code(text) => {
                if !matches!(self.links.last(), Some(LinkText::Auto)) {
                    self.push_str(&text);
                }
            }
            Event::SoftBreak => self.push_str(" "),
            Event::HardBreak => self.push_str("  \n"),
            _ => {}
        }
        Ok(())
    }

    fn push_str(&mut self, text: &str) {
        if self.images > 0 {
            return;
        }
        if let Some((_, heading)) = self.heading.as_mut() {
            heading.push_str(text);
        } else if let Some(item) = self.items.last_mut() {
            item.text.push_str(text);
        }
    }
}
