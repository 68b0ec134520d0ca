// self
use crate::{_prelude::*, obs::LoginStage};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedLogin<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedLogin<F> = F;

/// A span builder used by login providers.
#[derive(Clone, Debug)]
pub struct LoginSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl LoginSpan {
	/// Creates a new span tagged with the provided stage + provider label.
	pub fn new(stage: LoginStage, provider: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("identity_broker.login", stage = stage.as_str(), provider);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (stage, provider);

			Self {}
		}
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> LoginSpanGuard {
		#[cfg(feature = "tracing")]
		{
			LoginSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			LoginSpanGuard {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedLogin<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// RAII guard returned by [`LoginSpan::entered`].
pub struct LoginSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for LoginSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("LoginSpanGuard(..)")
	}
}
