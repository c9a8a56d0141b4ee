//! Message traits and the [`messages!`](crate::messages) declaration macro.

/// A closed set of message kinds accepted by one mailbox.
pub trait Message: Send + 'static {
	/// Name of the concrete kind held by this value.
	fn kind(&self) -> &'static str;
}

/// Moves one concrete message kind out of its mailbox enum.
pub trait Extract<M>: Sized {
	/// Returns the payload if `message` holds this kind, otherwise hands the
	/// message back untouched.
	fn extract(message: M) -> Result<Self, M>;
}

/// Declares a mailbox message enum over existing message structs.
///
/// Each listed struct becomes a same-named tuple variant. The macro also
/// generates [`Message`], `From<Struct>` for the enum and
/// [`Extract<Enum>`](Extract) for every struct.
///
/// ```
/// #[derive(Debug)]
/// pub struct Ping;
/// #[derive(Debug)]
/// pub struct Pong(pub u32);
///
/// teller_worker::messages! {
/// 	#[derive(Debug)]
/// 	pub enum Wire { Ping, Pong }
/// }
///
/// use teller_worker::{Extract, Message};
/// let msg: Wire = Pong(7).into();
/// assert_eq!(msg.kind(), "Pong");
/// assert!(Ping::extract(msg).is_err());
/// ```
#[macro_export]
macro_rules! messages {
	(
		$(#[$meta:meta])*
		$vis:vis enum $name:ident {
			$($variant:ident),+ $(,)?
		}
	) => {
		$(#[$meta])*
		$vis enum $name {
			$($variant($variant),)+
		}

		impl $crate::Message for $name {
			fn kind(&self) -> &'static str {
				match self {
					$(Self::$variant(_) => stringify!($variant),)+
				}
			}
		}

		$(
			impl ::core::convert::From<$variant> for $name {
				fn from(message: $variant) -> Self {
					Self::$variant(message)
				}
			}

			impl $crate::Extract<$name> for $variant {
				fn extract(message: $name) -> ::core::result::Result<Self, $name> {
					match message {
						$name::$variant(inner) => ::core::result::Result::Ok(inner),
						#[allow(unreachable_patterns)]
						other => ::core::result::Result::Err(other),
					}
				}
			}
		)+
	};
}
