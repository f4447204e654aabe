//! Utils to define a `clap` parser for an enum based on `strum`

#[macro_export]
macro_rules! clap_enum_variants {
    ($e: ty) => {{
        use clap::builder::TypedValueParser;
        use strum::VariantNames;
        clap::builder::PossibleValuesParser::new(<$e>::VARIANTS).map(|s| s.parse::<$e>().unwrap())
    }};
}

/// Expands a call to a function generic over a field element type to a match
/// over a [crate::FieldArgument], instantiating the function for the
/// concrete field type of each arm.
#[macro_export]
macro_rules! call_with_field {
    ($function:ident::<$field:ident>($($args:expr),*) ) => {
        match $field {
            FieldArgument::Bn254 => $function::<Bn254Field>($($args),*),
            FieldArgument::Bls12_381 => $function::<Bls12_381Field>($($args),*),
        }
    };
}
