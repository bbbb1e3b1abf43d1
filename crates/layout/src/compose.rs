//! Turns a settled document snapshot into a scene.
//!
//! The layout is a single column at the snapshot's logical width: a card with
//! a gradient top bar, then header, parties, items table, totals, payment
//! details, signatures and footer, top to bottom. The scene's height is
//! whatever the content needs; pagination happens later, on the bitmap.

use crate::fonts::FontWeight;
use crate::format::{format_amount, format_date, format_quantity};
use crate::text::{Align, TextStyle, Typesetter};
use folio_scene::{
    DocumentSnapshot, GradientStop, Group, ImageContent, ImageNode, ImageRole, ImageSlot, Scene,
    SceneNode, StrokeStyle,
};
use folio_types::{Color, MobileMoneyProvider, Party, Point, Rect, Size, TAX_RATE};

const ORANGE: Color = Color::hex(0xF97316);
const DEEP_ORANGE: Color = Color::hex(0xEA580C);
const INK: Color = Color::hex(0x1F2937);
const MUTED: Color = Color::hex(0x6B7280);
const FAINT: Color = Color::hex(0x9CA3AF);
const RULE: Color = Color::hex(0xE5E7EB);
const PANEL: Color = Color::hex(0xF9FAFB);
const WARM_PANEL: Color = Color::hex(0xFFF7ED);
const DUE_RED: Color = Color::hex(0xDC2626);
const MTN_YELLOW: Color = Color::hex(0xFFCB05);
const AIRTEL_RED: Color = Color::hex(0xE40000);

pub const PAGE_PADDING: f32 = 40.0;
const CARD_PADDING_Y: f32 = 40.0;
const CARD_PADDING_X: f32 = 32.0;
const TOP_BAR_HEIGHT: f32 = 8.0;
const SECTION_GAP: f32 = 32.0;
const COLUMN_GAP: f32 = 40.0;

const QTY_COL: f32 = 80.0;
const PRICE_COL: f32 = 120.0;
const AMOUNT_COL: f32 = 120.0;
const CELL_PAD_X: f32 = 16.0;
const ROW_PAD_Y: f32 = 18.0;
const TABLE_HEADER_HEIGHT: f32 = 44.0;
const EMPTY_ROW_HEIGHT: f32 = 64.0;

const TOTALS_WIDTH: f32 = 320.0;
const DATE_BOX_MIN_WIDTH: f32 = 180.0;
const SIGNATURE_LINE_WIDTH: f32 = 200.0;
const SIGNATURE_MIN_HEIGHT: f32 = 60.0;

const STAMP_ROTATION: f32 = -15.0;
const STAMP_OPACITY: f32 = 0.85;
const STAMP_BORDER: f32 = 4.0;

pub const EMPTY_ITEMS_TEXT: &str = "No items added yet";
pub const FOOTER_TEXT: &str = "Thank you for your business! • Payment terms: Due upon receipt";

/// Lays out `snapshot` at its logical width.
pub fn compose(snapshot: &DocumentSnapshot, setter: &Typesetter) -> Scene {
    let width = snapshot.logical_width();
    let left = PAGE_PADDING + CARD_PADDING_X;
    let mut composer = Composer {
        setter,
        snapshot,
        scene: Scene::new(width),
        left,
        width: (width - 2.0 * left).max(0.0),
        y: PAGE_PADDING + TOP_BAR_HEIGHT + CARD_PADDING_Y,
    };
    composer.header();
    composer.parties();
    composer.items();
    composer.totals();
    composer.payment();
    composer.signatures();
    composer.footer();
    composer.finish()
}

struct Composer<'a> {
    setter: &'a Typesetter,
    snapshot: &'a DocumentSnapshot,
    scene: Scene,
    left: f32,
    width: f32,
    y: f32,
}

impl Composer<'_> {
    fn right(&self) -> f32 {
        self.left + self.width
    }

    fn text(&mut self, text: &str, x: f32, top: f32, width: f32, align: Align, style: &TextStyle) {
        let run = self.setter.run(text, x, top, width, align, style);
        self.scene.push(SceneNode::Text(run));
    }

    /// Wrapped text; returns the height used.
    fn paragraph(
        &mut self,
        text: &str,
        x: f32,
        top: f32,
        width: f32,
        align: Align,
        style: &TextStyle,
    ) -> f32 {
        let lines = self.setter.wrap(text, style, width);
        for (i, line) in lines.iter().enumerate() {
            if !line.is_empty() {
                self.text(line, x, top + i as f32 * style.line_box(), width, align, style);
            }
        }
        lines.len() as f32 * style.line_box()
    }

    fn fill(&mut self, rect: Rect, color: Color, radius: f32) {
        self.scene.push(SceneNode::Rect {
            rect,
            fill: Some(color),
            stroke: None,
            radius,
        });
    }

    /// Inserts a panel behind the nodes pushed since `mark`.
    fn backdrop(&mut self, mark: usize, node: SceneNode) {
        self.scene.nodes.insert(mark, node);
    }

    fn rule(&mut self, x1: f32, x2: f32, y: f32, color: Color, width: f32) {
        self.scene.push(SceneNode::Line {
            from: Point::new(x1, y),
            to: Point::new(x2, y),
            stroke: StrokeStyle::solid(color, width),
        });
    }

    fn image(&mut self, slot: &ImageSlot, x: f32, y: f32) -> Size {
        let size = slot.placed_size();
        let content = match slot.state.image() {
            Some(image) => ImageContent::Decoded(image.clone()),
            None => ImageContent::Broken,
        };
        self.scene.push(SceneNode::Image(ImageNode {
            rect: Rect::new(x, y, size.width, size.height),
            content,
            cross_origin: slot.source.is_cross_origin(),
        }));
        size
    }

    fn header(&mut self) {
        let snapshot = self.snapshot;
        let doc = snapshot.document();
        let right_w = 260.0_f32.min(self.width / 2.0);
        let left_w = self.width - right_w - 20.0;
        let top = self.y;

        // Left: identity mark (or name) and tagline.
        let mut left_y = top;
        if let Some(slot) = snapshot.slot(ImageRole::IdentityMark) {
            let slot = slot.clone();
            left_y += self.image(&slot, self.left, left_y).height + 8.0;
        } else {
            let (name, color) = match doc.issuer.name() {
                Some(name) => (name.to_string(), ORANGE),
                None => ("Your Company".to_string(), FAINT),
            };
            let style = TextStyle::new(28.0, FontWeight::Black, color).line_height(1.2);
            left_y += self.paragraph(&name, self.left, left_y, left_w, Align::Left, &style) + 4.0;
        }
        if let Some(tagline) = doc.issuer.tagline() {
            let style = TextStyle::new(13.0, FontWeight::Regular, MUTED);
            left_y += self.paragraph(tagline, self.left, left_y, left_w, Align::Left, &style);
        }

        // Right: title, number and the date box.
        let right_x = self.right() - right_w;
        let mut right_y = top;
        let title = TextStyle::new(42.0, FontWeight::Black, INK).line_height(1.1);
        self.text("INVOICE", right_x, right_y, right_w, Align::Right, &title);
        right_y += title.line_box();
        let number = TextStyle::new(14.0, FontWeight::SemiBold, ORANGE);
        let number_text = self.snapshot.invoice_number().to_string();
        self.text(&number_text, right_x, right_y, right_w, Align::Right, &number);
        right_y += number.line_box() + 12.0;

        let label = TextStyle::new(11.0, FontWeight::Regular, MUTED).line_height(1.9);
        let value = TextStyle::new(14.0, FontWeight::Bold, INK).line_height(1.5);
        let mut rows = vec![("Issue Date", format_date(self.snapshot.issue_date()), INK)];
        if let Some(due) = doc.due_date {
            rows.push(("Due Date", format_date(due), DUE_RED));
        }
        let content_w = rows
            .iter()
            .map(|(l, v, _)| {
                self.setter.measure(l, &label) + self.setter.measure(v, &value) + 16.0
            })
            .fold(0.0_f32, f32::max);
        let box_w = (content_w + 24.0).max(DATE_BOX_MIN_WIDTH);
        let box_x = self.right() - box_w;
        let box_h = 24.0 + rows.len() as f32 * value.line_box();
        self.fill(Rect::new(box_x, right_y, box_w, box_h), WARM_PANEL, 8.0);
        let mut row_y = right_y + 12.0;
        for (l, v, color) in rows {
            self.text(l, box_x + 12.0, row_y, box_w - 24.0, Align::Left, &label);
            let value = TextStyle { color, ..value };
            self.text(&v, box_x + 12.0, row_y, box_w - 24.0, Align::Right, &value);
            row_y += value.line_box();
        }
        right_y += box_h;

        self.y = left_y.max(right_y) + SECTION_GAP;
        self.rule(self.left, self.right(), self.y, RULE, 2.0);
        self.y += SECTION_GAP;
    }

    fn parties(&mut self) {
        let snapshot = self.snapshot;
        let doc = snapshot.document();
        let col_w = (self.width - COLUMN_GAP) / 2.0;
        let top = self.y;
        let from_h = self.party(
            "FROM",
            &doc.issuer,
            ("Your Company", "Company Address"),
            self.left,
            top,
            col_w,
        );
        let to_h = self.party(
            "BILL TO",
            &doc.recipient,
            ("Client Name", "Client Address"),
            self.left + col_w + COLUMN_GAP,
            top,
            col_w,
        );
        self.y = top + from_h.max(to_h) + SECTION_GAP;
    }

    fn party(
        &mut self,
        heading: &str,
        party: &Party,
        placeholders: (&str, &str),
        x: f32,
        top: f32,
        width: f32,
    ) -> f32 {
        let mut y = top;
        let heading_style = TextStyle::new(12.0, FontWeight::Bold, ORANGE);
        self.text(heading, x, y, width, Align::Left, &heading_style);
        y += heading_style.line_box() + 6.0;

        let (name, name_color) = match party.name() {
            Some(name) => (name, INK),
            None => (placeholders.0, FAINT),
        };
        let name_style = TextStyle::new(18.0, FontWeight::Bold, name_color);
        y += self.paragraph(name, x, y, width, Align::Left, &name_style) + 4.0;

        let (address, address_color) = match party.address() {
            Some(address) => (address, MUTED),
            None => (placeholders.1, FAINT),
        };
        let address_style = TextStyle::new(13.0, FontWeight::Regular, address_color).line_height(1.6);
        y += self.paragraph(address, x, y, width, Align::Left, &address_style);

        let details: Vec<String> = [
            party.representative().map(|r| format!("Representative: {}", r)),
            party.contact().map(|c| format!("Contact: {}", c)),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !details.is_empty() {
            y += 12.0;
            let mark = self.scene.nodes.len();
            let style = TextStyle::new(12.0, FontWeight::Regular, INK).line_height(1.5);
            let mut inner = y + 10.0;
            for line in &details {
                inner += self.paragraph(line, x + 10.0, inner, width - 20.0, Align::Left, &style);
            }
            let box_h = inner + 10.0 - y;
            self.backdrop(
                mark,
                SceneNode::Rect {
                    rect: Rect::new(x, y, width, box_h),
                    fill: Some(PANEL),
                    stroke: None,
                    radius: 6.0,
                },
            );
            y += box_h;
        }
        y - top
    }

    fn items(&mut self) {
        let snapshot = self.snapshot;
        let doc = snapshot.document();
        let x = self.left;
        let desc_w = self.width - QTY_COL - PRICE_COL - AMOUNT_COL;
        let qty_x = x + desc_w;
        let price_x = qty_x + QTY_COL;
        let amount_x = price_x + PRICE_COL;

        let head = TextStyle::new(12.0, FontWeight::Bold, Color::WHITE);
        self.fill(Rect::new(x, self.y, self.width, TABLE_HEADER_HEIGHT), INK, 0.0);
        let head_top = self.y + (TABLE_HEADER_HEIGHT - head.line_box()) / 2.0;
        self.text("Description", x + CELL_PAD_X, head_top, desc_w - CELL_PAD_X, Align::Left, &head);
        self.text("Qty", qty_x, head_top, QTY_COL, Align::Center, &head);
        self.text("Unit Price", price_x, head_top, PRICE_COL - CELL_PAD_X, Align::Right, &head);
        self.text("Amount", amount_x, head_top, AMOUNT_COL - CELL_PAD_X, Align::Right, &head);
        self.y += TABLE_HEADER_HEIGHT;

        if doc.items.is_empty() {
            let style = TextStyle::new(14.0, FontWeight::Regular, FAINT);
            let top = self.y + (EMPTY_ROW_HEIGHT - style.line_box()) / 2.0;
            self.text(EMPTY_ITEMS_TEXT, x, top, self.width, Align::Center, &style);
            self.y += EMPTY_ROW_HEIGHT;
            self.rule(x, self.right(), self.y, RULE, 1.0);
        }

        let cell = TextStyle::new(14.0, FontWeight::Regular, INK).line_height(1.5);
        let amount_style = TextStyle::new(14.0, FontWeight::SemiBold, INK).line_height(1.5);
        for item in &doc.items {
            let top = self.y + ROW_PAD_Y;
            let desc_h = self.paragraph(
                &item.description,
                x + CELL_PAD_X,
                top,
                desc_w - 2.0 * CELL_PAD_X,
                Align::Left,
                &cell,
            );
            self.text(&format_quantity(item.quantity), qty_x, top, QTY_COL, Align::Center, &cell);
            self.text(
                &format_amount(item.unit_price),
                price_x,
                top,
                PRICE_COL - CELL_PAD_X,
                Align::Right,
                &cell,
            );
            self.text(
                &format_amount(item.amount()),
                amount_x,
                top,
                AMOUNT_COL - CELL_PAD_X,
                Align::Right,
                &amount_style,
            );
            self.y += desc_h.max(cell.line_box()) + 2.0 * ROW_PAD_Y;
            self.rule(x, self.right(), self.y, RULE, 1.0);
        }
        self.y += SECTION_GAP;
    }

    fn totals(&mut self) {
        let snapshot = self.snapshot;
        let doc = snapshot.document();
        let totals = doc.totals();
        let box_w = TOTALS_WIDTH.min(self.width);
        let x = self.right() - box_w;
        let inner_x = x + 20.0;
        let inner_w = box_w - 40.0;
        let top = self.y;
        let mark = self.scene.nodes.len();

        let label = TextStyle::new(14.0, FontWeight::Regular, MUTED).line_height(1.6);
        let value = TextStyle::new(14.0, FontWeight::SemiBold, INK).line_height(1.6);
        let mut y = top + 20.0;
        let mut rows = vec![("Subtotal".to_string(), totals.subtotal)];
        if doc.include_tax {
            rows.push((format!("VAT ({}%)", (TAX_RATE * 100.0).round()), totals.tax));
        }
        for (name, amount) in rows {
            self.text(&name, inner_x, y, inner_w, Align::Left, &label);
            self.text(&format_amount(amount), inner_x, y, inner_w, Align::Right, &value);
            y += label.line_box() + 8.0;
        }

        y += 4.0;
        self.rule(inner_x, inner_x + inner_w, y, RULE, 2.0);
        y += 12.0;

        let total_label = TextStyle::new(16.0, FontWeight::Bold, INK).line_height(1.5);
        let total_value = TextStyle::new(24.0, FontWeight::Black, DEEP_ORANGE).line_height(1.3);
        let label_top = y + (total_value.line_box() - total_label.line_box()) / 2.0;
        self.text("Total Due", inner_x, label_top, inner_w, Align::Left, &total_label);
        self.text(&format_amount(totals.total), inner_x, y, inner_w, Align::Right, &total_value);
        y += total_value.line_box() + 20.0;

        self.backdrop(
            mark,
            SceneNode::Rect {
                rect: Rect::new(x, top, box_w, y - top),
                fill: Some(PANEL),
                stroke: None,
                radius: 8.0,
            },
        );
        self.y = y + SECTION_GAP;
    }

    fn payment(&mut self) {
        let snapshot = self.snapshot;
        let payment = &snapshot.document().payment;
        if payment.is_empty() {
            return;
        }

        let mut cards: Vec<PaymentCard> = Vec::new();
        if let Some(bank) = payment.bank() {
            let lines = [
                ("Bank", &bank.bank_name),
                ("A/C Name", &bank.account_name),
                ("A/C No", &bank.account_number),
                ("SWIFT", &bank.swift_code),
            ]
            .into_iter()
            .filter_map(|(label, value)| {
                value
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| format!("{}: {}", label, v))
            })
            .collect();
            cards.push(PaymentCard {
                title: "Bank Transfer",
                badge: None,
                lines,
            });
        }
        for mobile in payment.mobile_money() {
            let mut lines = Vec::new();
            if let Some(name) = mobile.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
                lines.push(format!("Name: {}", name));
            }
            lines.push(format!("Tel: {}", mobile.number.trim()));
            let badge = match mobile.provider {
                MobileMoneyProvider::Mtn => (mobile.provider.badge(), MTN_YELLOW, INK),
                MobileMoneyProvider::Airtel => (mobile.provider.badge(), AIRTEL_RED, Color::WHITE),
            };
            cards.push(PaymentCard {
                title: mobile.provider.title(),
                badge: Some(badge),
                lines,
            });
        }

        let heading = TextStyle::new(16.0, FontWeight::Bold, INK);
        self.text("Payment Details", self.left, self.y, self.width, Align::Left, &heading);
        self.y += heading.line_box() + 12.0;

        let gap = 16.0;
        let n = cards.len() as f32;
        let card_w = (self.width - gap * (n - 1.0)) / n;
        let top = self.y;
        let mark = self.scene.nodes.len();
        let mut tallest = 0.0_f32;
        for (i, card) in cards.iter().enumerate() {
            let x = self.left + i as f32 * (card_w + gap);
            tallest = tallest.max(self.payment_card(card, x, top, card_w));
        }
        for i in 0..cards.len() {
            let x = self.left + i as f32 * (card_w + gap);
            self.backdrop(
                mark,
                SceneNode::Rect {
                    rect: Rect::new(x, top, card_w, tallest),
                    fill: None,
                    stroke: Some(StrokeStyle::solid(RULE, 1.0)),
                    radius: 8.0,
                },
            );
        }
        self.y = top + tallest + SECTION_GAP;
    }

    fn payment_card(&mut self, card: &PaymentCard, x: f32, top: f32, width: f32) -> f32 {
        let pad = 14.0;
        let mut y = top + pad;
        let title = TextStyle::new(13.0, FontWeight::Bold, INK);
        let mut title_x = x + pad;
        if let Some((badge, fill, ink)) = card.badge {
            let badge_style = TextStyle::new(10.0, FontWeight::Bold, ink).line_height(1.8);
            let badge_w = self.setter.measure(badge, &badge_style) + 12.0;
            let badge_top = y + (title.line_box() - badge_style.line_box()) / 2.0;
            self.fill(
                Rect::new(title_x, badge_top, badge_w, badge_style.line_box()),
                fill,
                4.0,
            );
            self.text(badge, title_x, badge_top, badge_w, Align::Center, &badge_style);
            title_x += badge_w + 8.0;
        }
        let title_w = (x + width - pad - title_x).max(0.0);
        self.text(card.title, title_x, y, title_w, Align::Left, &title);
        y += title.line_box() + 6.0;

        let line = TextStyle::new(12.0, FontWeight::Regular, INK).line_height(1.6);
        for text in &card.lines {
            y += self.paragraph(text, x + pad, y, width - 2.0 * pad, Align::Left, &line);
        }
        y + pad - top
    }

    fn signatures(&mut self) {
        let snapshot = self.snapshot;
        let doc = snapshot.document();
        let col_w = (self.width - COLUMN_GAP) / 2.0;
        let columns = [
            (
                ImageRole::IssuerSignature,
                "Authorized Signature",
                doc.issuer.name(),
                self.left,
            ),
            (
                ImageRole::RecipientSignature,
                "Client Signature",
                doc.recipient.name(),
                self.left + col_w + COLUMN_GAP,
            ),
        ];

        let region_h = columns
            .iter()
            .filter_map(|(role, ..)| snapshot.slot(*role))
            .map(|slot| slot.placed_size().height)
            .fold(SIGNATURE_MIN_HEIGHT, f32::max);
        let top = self.y;
        let label = TextStyle::new(12.0, FontWeight::Regular, MUTED);
        let name_style = TextStyle::new(12.0, FontWeight::SemiBold, INK);
        let mut bottom = top;

        for (role, caption, name, x) in columns {
            if let Some(slot) = snapshot.slot(role) {
                let slot = slot.clone();
                let h = slot.placed_size().height;
                self.image(&slot, x, top + region_h - h);
            }
            let line_y = top + region_h + 4.0;
            self.rule(x, x + SIGNATURE_LINE_WIDTH.min(col_w), line_y, INK, 1.0);
            let mut y = line_y + 6.0;
            self.text(caption, x, y, col_w, Align::Left, &label);
            y += label.line_box();
            if let Some(name) = name {
                self.text(name, x, y, col_w, Align::Left, &name_style);
                y += name_style.line_box();
            }
            bottom = bottom.max(y);
        }

        if doc.stamp.applied {
            self.stamp(doc.stamp.label(), top + region_h / 2.0);
        }
        self.y = bottom + COLUMN_GAP;
    }

    /// Rotated overlay; does not take part in the flow.
    fn stamp(&mut self, text: &str, center_y: f32) {
        let style = TextStyle::new(32.0, FontWeight::Black, DEEP_ORANGE).line_height(1.2);
        let text_w = self.setter.measure(text, &style);
        let box_w = text_w + 48.0;
        let box_h = style.line_box() + 20.0;
        let center_x = self.right() - box_w / 2.0 - 20.0;
        let rect = Rect::new(center_x - box_w / 2.0, center_y - box_h / 2.0, box_w, box_h);
        let run = self
            .setter
            .run(text, rect.x, rect.y + 10.0, box_w, Align::Center, &style);
        self.scene.push(SceneNode::Group(Group {
            rotation: STAMP_ROTATION,
            pivot: Point::new(center_x, center_y),
            opacity: STAMP_OPACITY,
            children: vec![
                SceneNode::Rect {
                    rect,
                    fill: None,
                    stroke: Some(StrokeStyle::solid(DEEP_ORANGE, STAMP_BORDER)),
                    radius: 8.0,
                },
                SceneNode::Text(run),
            ],
        }));
    }

    fn footer(&mut self) {
        self.rule(self.left, self.right(), self.y, RULE, 1.0);
        self.y += 20.0;
        let style = TextStyle::new(12.0, FontWeight::Regular, FAINT);
        self.y += self.paragraph(FOOTER_TEXT, self.left, self.y, self.width, Align::Center, &style);
    }

    fn finish(mut self) -> Scene {
        let card_bottom = self.y + CARD_PADDING_Y;
        let card_w = self.scene.width - 2.0 * PAGE_PADDING;
        let card = SceneNode::Rect {
            rect: Rect::new(PAGE_PADDING, PAGE_PADDING, card_w, card_bottom - PAGE_PADDING),
            fill: Some(Color::WHITE),
            stroke: Some(StrokeStyle::solid(RULE, 1.0)),
            radius: 12.0,
        };
        let top_bar = SceneNode::Gradient {
            rect: Rect::new(PAGE_PADDING, PAGE_PADDING, card_w, TOP_BAR_HEIGHT),
            stops: vec![
                GradientStop { offset: 0.0, color: ORANGE },
                GradientStop { offset: 0.5, color: DEEP_ORANGE },
                GradientStop { offset: 1.0, color: INK },
            ],
        };
        self.scene.nodes.insert(0, top_bar);
        self.scene.nodes.insert(0, card);
        self.scene.height = card_bottom + PAGE_PADDING;
        self.scene
    }
}

struct PaymentCard {
    title: &'static str,
    badge: Option<(&'static str, Color, Color)>,
    lines: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontLibrary;
    use chrono::{Local, TimeZone};
    use folio_scene::{AssetState, DecodedImage, SnapshotMarker, SnapshotOptions};
    use folio_types::{
        BankTransfer, ImageSource, InvoiceDocument, LineItem, MobileMoney, PaymentInstructions,
        Stamp,
    };
    use std::sync::Arc;

    fn snapshot(doc: &InvoiceDocument) -> DocumentSnapshot {
        let now = Local.timestamp_millis_opt(1_700_000_000_000).unwrap();
        DocumentSnapshot::capture(doc, SnapshotMarker::new(1), SnapshotOptions::default(), now)
    }

    fn setter() -> Typesetter {
        Typesetter::new(FontLibrary::new())
    }

    fn sample() -> InvoiceDocument {
        InvoiceDocument {
            issuer: Party {
                name: Some("Acme Ltd".into()),
                address: Some("Plot 4\nKampala Road".into()),
                ..Default::default()
            },
            recipient: Party::named("Client Co"),
            items: vec![
                LineItem::new("Consulting", 2.0, 500_000.0),
                LineItem::new("Travel", 1.0, 150_000.0),
            ],
            include_tax: true,
            ..Default::default()
        }
    }

    #[test]
    fn scene_has_fixed_width_and_sections() {
        let scene = compose(&snapshot(&sample()), &setter());
        assert_eq!(scene.width, 794.0);
        assert!(scene.height > 600.0);
        for needle in [
            "INVOICE",
            "Acme Ltd",
            "Client Co",
            "Consulting",
            "UGX 1,000,000",
            "VAT (18%)",
            "UGX 207,000",
            "UGX 1,357,000",
            "Authorized Signature",
            "Client Signature",
            FOOTER_TEXT,
        ] {
            assert!(scene.contains_text(needle), "missing {needle}");
        }
        assert!(!scene.contains_text(EMPTY_ITEMS_TEXT));
        assert!(!scene.contains_text("Payment Details"));
    }

    #[test]
    fn invoice_number_is_shown_as_entered() {
        let mut doc = sample();
        doc.invoice_number = Some("INV-000042".into());
        let scene = compose(&snapshot(&doc), &setter());
        let runs = scene.text_runs();
        assert!(runs.iter().any(|run| run.text == "INV-000042"));
        assert!(!scene.contains_text("#INV"));
    }

    #[test]
    fn empty_items_render_empty_state_row() {
        let doc = InvoiceDocument::default();
        let scene = compose(&snapshot(&doc), &setter());
        assert!(scene.contains_text(EMPTY_ITEMS_TEXT));
        assert!(scene.contains_text("Client Name"));
        assert!(scene.contains_text("Your Company"));
        assert!(!scene.contains_text("VAT"));
        assert!(scene.contains_text("UGX 0"));
    }

    #[test]
    fn more_items_make_a_taller_scene() {
        let short = compose(&snapshot(&sample()), &setter());
        let mut long_doc = sample();
        long_doc.items = (0..40)
            .map(|i| LineItem::new(format!("Line {i}"), 1.0, 10.0))
            .collect();
        let long = compose(&snapshot(&long_doc), &setter());
        assert!(long.height > short.height + 1000.0);
    }

    #[test]
    fn payment_details_only_when_present() {
        let mut doc = sample();
        doc.payment = PaymentInstructions {
            bank: Some(BankTransfer {
                bank_name: Some("Stanbic".into()),
                account_number: Some("9030".into()),
                ..Default::default()
            }),
            mobile_money: vec![MobileMoney {
                provider: MobileMoneyProvider::Airtel,
                name: Some("Acme".into()),
                number: "0700000000".into(),
            }],
        };
        let scene = compose(&snapshot(&doc), &setter());
        for needle in ["Payment Details", "Bank Transfer", "Bank: Stanbic", "A/C No: 9030", "Airtel Money", "Tel: 0700000000"] {
            assert!(scene.contains_text(needle), "missing {needle}");
        }
        assert!(!scene.contains_text("SWIFT"));
        assert!(!scene.contains_text("MTN MoMo"));
    }

    #[test]
    fn stamp_is_a_rotated_translucent_group() {
        let mut doc = sample();
        doc.stamp = Stamp {
            applied: true,
            text: "".into(),
        };
        let scene = compose(&snapshot(&doc), &setter());
        let group = scene
            .nodes
            .iter()
            .find_map(|n| match n {
                SceneNode::Group(g) => Some(g),
                _ => None,
            })
            .expect("stamp group");
        assert_eq!(group.rotation, -15.0);
        assert_eq!(group.opacity, 0.85);
        assert!(scene.contains_text("PAID"));
    }

    #[test]
    fn images_are_constrained_and_failures_are_placeholders() {
        let mut doc = sample();
        doc.issuer.logo = Some(ImageSource::from("logo.png"));
        doc.issuer_signature = Some(ImageSource::from("https://cdn.example.com/sig.png"));
        let mut snap = snapshot(&doc);
        let wide = DecodedImage::new(1600, 400, vec![255; 1600 * 400 * 4]).unwrap();
        snap.settle(0, AssetState::Loaded(Arc::new(wide)));
        snap.settle(1, AssetState::Failed("timeout".into()));

        let scene = compose(&snap, &setter());
        let images = scene.images();
        assert_eq!(images.len(), 2);
        assert_eq!((images[0].rect.width, images[0].rect.height), (400.0, 100.0));
        assert!(!images[0].cross_origin);
        assert_eq!(images[1].content, ImageContent::Broken);
        assert!(images[1].cross_origin);
    }
}
