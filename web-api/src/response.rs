use actix_web::{
    HttpRequest, HttpResponse, Responder,
    body::BoxBody,
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    web::Bytes,
};
use processors::Subscription;
use serde::Serialize;
use tokio_stream::{StreamExt, once};
use tracing::error;
use tracking_core::TrackingEvent;

#[derive(Debug)]
pub struct Response<T> {
    pub body: T,
}

impl<T> Response<T> {
    pub fn new(body: T) -> Self {
        Response { body }
    }
}

impl<T> Responder for Response<T>
where
    T: Serialize,
{
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        HttpResponse::Ok().json(self.body)
    }
}

/// A Server-Sent Events stream of every event published on one topic, starting at the time of
/// subscription.
pub struct EventStream {
    subscription: Subscription,
}

impl EventStream {
    pub fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }
}

pub fn to_frame(event: &TrackingEvent) -> serde_json::Result<Bytes> {
    let json = serde_json::to_string(event)?;
    Ok(Bytes::from(format!("data: {json}\n\n")))
}

impl Responder for EventStream {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        let topic = self.subscription.topic();

        // Flushes the response head so clients know the subscription is live.
        let stream = once(Bytes::from(format!(": subscribed to {topic}\n\n")))
            .chain(
                self.subscription
                    .into_stream()
                    .filter_map(|event| match to_frame(&event) {
                        Ok(frame) => Some(frame),
                        Err(e) => {
                            error!("failed to serialize event: {e:?}");
                            None
                        }
                    }),
            )
            .map(Ok::<_, String>);

        HttpResponse::Ok()
            .insert_header((CONTENT_TYPE, "text/event-stream"))
            .insert_header((CACHE_CONTROL, "no-cache"))
            .streaming(stream)
    }
}
