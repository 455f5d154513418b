use std::{
    pin::Pin,
    task::{Context, Poll},
};

use actix_web::error::PayloadError;
use bytes::Bytes;
use futures_util::Stream;

/// Request body stream that errors with [`PayloadError::Overflow`] once more
/// than `limit` bytes have been read.
///
/// Nothing past the limit is handed to the consumer.
pub struct LimitedBody<S> {
    inner: S,
    limit: usize,
    read: usize,
    exceeded: bool,
}

impl<S> LimitedBody<S> {
    pub fn new(inner: S, limit: usize) -> Self {
        LimitedBody {
            inner,
            limit,
            read: 0,
            exceeded: false,
        }
    }
}

impl<S> Stream for LimitedBody<S>
where
    S: Stream<Item = Result<Bytes, PayloadError>> + Unpin,
{
    type Item = Result<Bytes, PayloadError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.exceeded {
            return Poll::Ready(None);
        }

        match Pin::new(&mut this.inner).poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                this.read += chunk.len();
                if this.read > this.limit {
                    this.exceeded = true;
                    Poll::Ready(Some(Err(PayloadError::Overflow)))
                } else {
                    Poll::Ready(Some(Ok(chunk)))
                }
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::{stream, StreamExt};

    fn chunks(sizes: &[usize]) -> impl Stream<Item = Result<Bytes, PayloadError>> + Unpin {
        stream::iter(
            sizes
                .iter()
                .map(|n| Ok(Bytes::from(vec![b'a'; *n])))
                .collect::<Vec<_>>(),
        )
    }

    #[actix_rt::test]
    async fn passes_bodies_up_to_the_limit() {
        let body: Vec<_> = LimitedBody::new(chunks(&[4, 4, 2]), 10).collect().await;

        assert_eq!(body.len(), 3);
        assert!(body.iter().all(Result::is_ok));
    }

    #[actix_rt::test]
    async fn overflows_one_byte_past_the_limit_and_stops() {
        let body: Vec<_> = LimitedBody::new(chunks(&[4, 4, 3, 5]), 10).collect().await;

        assert_eq!(body.len(), 3);
        assert!(matches!(body[2], Err(PayloadError::Overflow)));
    }
}
