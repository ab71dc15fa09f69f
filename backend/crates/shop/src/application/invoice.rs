//! Invoice Use Case
//!
//! Renders an order into a PDF invoice. Only the purchaser may fetch it;
//! anyone else gets a forbidden error even when the order exists.

use std::sync::Arc;

use kernel::id::{OrderId, UserId};
use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::domain::entity::Order;
use crate::domain::repository::OrderRepository;
use crate::error::{ShopError, ShopResult};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 8.0;

/// A rendered invoice ready to serve
#[derive(Debug)]
pub struct InvoiceDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Invoice use case
pub struct InvoiceUseCase<O>
where
    O: OrderRepository,
{
    order_repo: Arc<O>,
}

impl<O> InvoiceUseCase<O>
where
    O: OrderRepository,
{
    pub fn new(order_repo: Arc<O>) -> Self {
        Self { order_repo }
    }

    pub async fn render(&self, order_id: &OrderId, requester: &UserId) -> ShopResult<InvoiceDocument> {
        let order = self
            .order_repo
            .find_by_id(order_id)
            .await?
            .ok_or(ShopError::NotFound)?;

        if order.purchaser.user_id != *requester {
            return Err(ShopError::Forbidden);
        }

        let bytes = render_pdf(&order)?;

        Ok(InvoiceDocument {
            filename: format!("invoice-{}.pdf", order.order_id),
            bytes,
        })
    }
}

fn render_pdf(order: &Order) -> ShopResult<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        format!("Invoice {}", order.order_id),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "invoice",
    );

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ShopError::Internal(format!("PDF font error: {}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ShopError::Internal(format!("PDF font error: {}", e)))?;

    let mut layer = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT_MM - MARGIN_MM;

    layer.use_text("Invoice", 24.0, Mm(MARGIN_MM), Mm(y), &bold);
    y -= LINE_HEIGHT_MM;
    layer.use_text(
        format!("Order {}", order.order_id),
        10.0,
        Mm(MARGIN_MM),
        Mm(y),
        &font,
    );
    y -= 2.0 * LINE_HEIGHT_MM;

    for line in &order.lines {
        // Start a fresh page when the current one runs out
        if y < MARGIN_MM + 2.0 * LINE_HEIGHT_MM {
            let (new_page, new_layer) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "invoice");
            layer = doc.get_page(new_page).get_layer(new_layer);
            y = PAGE_HEIGHT_MM - MARGIN_MM;
        }

        layer.use_text(
            format!(
                "{} - {} x ${} = ${}",
                line.title,
                line.quantity,
                line.unit_price,
                line.subtotal()
            ),
            12.0,
            Mm(MARGIN_MM),
            Mm(y),
            &font,
        );
        y -= LINE_HEIGHT_MM;
    }

    y -= LINE_HEIGHT_MM;
    layer.use_text("---", 12.0, Mm(MARGIN_MM), Mm(y), &font);
    y -= LINE_HEIGHT_MM;
    layer.use_text(
        format!("Total: ${}", order.total()),
        14.0,
        Mm(MARGIN_MM),
        Mm(y),
        &bold,
    );

    doc.save_to_bytes()
        .map_err(|e| ShopError::Internal(format!("PDF render error: {}", e)))
}
