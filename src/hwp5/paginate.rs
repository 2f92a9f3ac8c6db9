//! Page-breaking pass.
//!
//! The format has no page-boundary record. A line segment whose vertical
//! position is zero marks the first line of a new page; when that segment
//! is not the paragraph's first, the paragraph straddles the boundary and
//! is split into two linked halves, one per page.

use log::warn;

use crate::model::{Document, Page, ParagraphId};

/// Partitions every section's paragraphs into pages, splitting the
/// paragraphs that straddle a page boundary.
///
/// Rebuilds `doc.pages` from scratch; run once after all sections are
/// decoded.
pub fn paginate(doc: &mut Document) {
    doc.pages.clear();

    for section in 0..doc.sections.len() {
        let mut current: Option<usize> = None;
        let pids = doc.sections[section].paragraphs.clone();

        for mut pid in pids {
            let breaks: Vec<usize> = doc
                .paragraph(pid)
                .line_segs
                .iter()
                .enumerate()
                .filter(|(_, seg)| seg.v_pos == 0)
                .map(|(n, _)| n)
                .collect();

            let mut split = false;
            for n in breaks {
                if n != 0 {
                    // A paragraph spans at most two pages; the link chain
                    // has exactly two nodes. Breaks past the first split
                    // stay in the continuation half.
                    if split {
                        warn!("paragraph spans more than two pages; extra break ignored");
                        continue;
                    }
                    split = true;

                    // The boundary falls inside this paragraph: the lines
                    // before it stay on the accumulating page, the rest
                    // move to the continuation half.
                    let continuation = split_paragraph(doc, pid, n);
                    let page = match current {
                        Some(page) => page,
                        None => {
                            warn!("mid-paragraph page break with no open page");
                            new_page(doc, section)
                        }
                    };
                    doc.pages[page].paragraphs.push(pid);
                    pid = continuation;
                }

                current = Some(new_page(doc, section));
            }

            let page = match current {
                Some(page) => page,
                None => {
                    warn!("paragraph without a page-start line segment");
                    new_page(doc, section)
                }
            };
            doc.pages[page].paragraphs.push(pid);
            current = Some(page);
        }
    }
}

/// Splits a paragraph before line segment `n`, returning the continuation
/// half. The two halves reference each other through `link`.
fn split_paragraph(doc: &mut Document, pid: ParagraphId, n: usize) -> ParagraphId {
    let original = doc.paragraph(pid);
    let mut continuation = original.clone();
    continuation.line_start = n;
    continuation.line_end = original.line_segs.len();
    continuation.link = Some(pid);

    let continuation_pid = doc.alloc_paragraph(continuation);

    let original = doc.paragraph_mut(pid);
    original.line_end = n;
    original.link = Some(continuation_pid);

    continuation_pid
}

fn new_page(doc: &mut Document, section: usize) -> usize {
    doc.pages.push(Page::new(section));
    doc.pages.len() - 1
}
