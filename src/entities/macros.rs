//! Macros for declaring request types
//!
//! These macros generate the [`RequestSchema`](crate::core::schema::RequestSchema)
//! implementation each request type needs, from a compact declaration of its
//! fields, locale, messages and attribute names.

/// Declare a request type and its fields
///
/// Rule expressions are either pipe-delimited strings or arrays of tokens.
/// Everything after `fields` is optional, but must keep this order. The
/// locale is a string literal.
///
/// # Example
/// ```rust,ignore
/// request_schema!(
///     CreateUser,
///     fields: {
///         name: "required|string|max:255",
///         email: ["required", "email"],
///         age: "nullable|integer|min:18",
///     },
///     lang: "fr",
///     messages: {
///         "email.required" => "Merci d'indiquer votre :attribute.",
///     },
///     attributes: {
///         email => "adresse e-mail",
///     },
/// );
///
/// let entity = RequestEntity::of::<CreateUser>().json(payload).build()?;
/// ```
#[macro_export]
macro_rules! request_schema {
    (
        $type:ident,
        fields: {
            $( $field:ident : $rules:expr ),* $(,)?
        } $(,)?
        $( lang: $lang:literal $(,)? )?
        $( messages: {
            $( $message_key:expr => $message:expr ),* $(,)?
        } $(,)? )?
        $( attributes: {
            $( $attribute_field:ident => $attribute:expr ),* $(,)?
        } $(,)? )?
    ) => {
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $type;

        impl $crate::core::schema::RequestSchema for $type {
            fn fields() -> ::std::result::Result<
                $crate::core::field::FieldSpec,
                $crate::core::error::ConfigError,
            > {
                #[allow(unused_mut)]
                let mut fields = $crate::core::field::FieldSpec::new();
                $(
                    fields.insert(stringify!($field), $rules)?;
                )*
                Ok(fields)
            }

            $(
                fn lang() -> &'static str {
                    $lang
                }
            )?

            $(
                fn messages() -> $crate::core::field::Messages {
                    #[allow(unused_mut)]
                    let mut messages = $crate::core::field::Messages::new();
                    $(
                        messages.insert(
                            ::std::string::String::from($message_key),
                            ::std::string::String::from($message),
                        );
                    )*
                    messages
                }
            )?

            $(
                fn attributes() -> $crate::core::field::CustomAttributes {
                    #[allow(unused_mut)]
                    let mut attributes = $crate::core::field::CustomAttributes::new();
                    $(
                        attributes.insert(
                            ::std::string::String::from(stringify!($attribute_field)),
                            ::std::string::String::from($attribute),
                        );
                    )*
                    attributes
                }
            )?
        }
    };
}
