//! Alert message rendering.

use crate::http::request::RequestContext;
use crate::registry::Honeytoken;

/// A rendered alert, ready for a notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub token_id: i64,
    /// Destination address taken from the token.
    pub receiver: String,
    pub body: String,
}

/// Render the alert for a triggered token.
///
/// Pure: no I/O, no logging. Every field appears exactly once, in this order:
/// title, comment, URL, method, client address, header block, body.
pub fn compose_alert(token: &Honeytoken, ctx: &RequestContext) -> AlertMessage {
    let body = format!(
        "Token Title: {title}\r\n\
         Token Comment: {comment}\r\n\
         Requested URL: {uri}\r\n\
         Method: {method}\r\n\
         Client IP: {client_ip}\r\n\
         \r\n\
         ==Header==\r\n\
         {headers}\
         \r\n\
         ==Body==\r\n\
         {request_body}",
        title = token.title,
        comment = token.comment,
        uri = ctx.uri,
        method = ctx.method,
        client_ip = ctx.client_ip,
        headers = ctx.header_block(),
        request_body = ctx.body_text(),
    );

    AlertMessage {
        token_id: token.id,
        receiver: token.notify_receiver.clone(),
        body,
    }
}
