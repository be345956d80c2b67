/*
 * Copyright (2024) Volcengine
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */
extern crate proc_macro;

use proc_macro::TokenStream;

use quote::quote;
use syn::parse_macro_input;
use syn::DeriveInput;

#[proc_macro_derive(Envelope)]
pub fn derive_envelope(input: TokenStream) -> TokenStream {
    let DeriveInput { ident, .. } = parse_macro_input!(input);

    let output = quote! {
        impl #ident{
            pub fn code(&self) -> i64 {
                self.envelope.code
            }

            pub fn message(&self) -> &str {
                &self.envelope.message
            }

            pub fn request_id(&self) -> &str {
                &self.envelope.request_id
            }

            pub fn is_success(&self) -> bool {
                self.envelope.code == 0
            }

            pub fn envelope(&self) -> &crate::common::ResponseEnvelope {
                &self.envelope
            }
        }

        impl crate::common::EnvelopeTrait for #ident{
            fn code(&self) -> i64 {
                self.envelope.code
            }

            fn message(&self) -> &str {
                &self.envelope.message
            }

            fn request_id(&self) -> &str {
                &self.envelope.request_id
            }
        }
    };
    output.into()
}

#[proc_macro_derive(FileLocation)]
pub fn derive_file_location(input: TokenStream) -> TokenStream {
    let DeriveInput { ident, .. } = parse_macro_input!(input);
    let output = quote! {
        impl #ident{
            pub fn dir_name(&self) -> &str {
                &self.dir_name
            }
            pub fn file_name(&self) -> &str {
                &self.file_name
            }
            pub fn set_dir_name(&mut self, dir_name: impl Into<String>) {
                self.dir_name = dir_name.into();
            }
            pub fn set_file_name(&mut self, file_name: impl Into<String>) {
                self.file_name = file_name.into();
            }
        }

        impl crate::internal::FileLocation for #ident{
            fn dir_name(&self) -> &str {
                &self.dir_name
            }
            fn file_name(&self) -> &str {
                &self.file_name
            }
        }
    };
    output.into()
}

#[proc_macro_derive(UploadOption)]
pub fn derive_upload_option(input: TokenStream) -> TokenStream {
    let DeriveInput { ident, .. } = parse_macro_input!(input);
    let output = quote! {
        impl #ident{
            pub fn biz_attr(&self) -> &str {
                &self.biz_attr
            }
            pub fn replace(&self) -> bool {
                self.replace
            }
            pub fn set_biz_attr(&mut self, biz_attr: impl Into<String>) {
                self.biz_attr = biz_attr.into();
            }
            pub fn set_replace(&mut self, replace: bool) {
                self.replace = replace;
            }
        }

        impl crate::internal::UploadOption for #ident{
            fn biz_attr(&self) -> &str {
                &self.biz_attr
            }
            fn replace(&self) -> bool {
                self.replace
            }
        }
    };
    output.into()
}

#[proc_macro_derive(FromRefAndDisplay)]
pub fn derive_from_ref(input: TokenStream) -> TokenStream {
    let DeriveInput { ident, .. } = parse_macro_input!(input);
    let output = quote! {
         impl std::fmt::Display for #ident{
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
         }

         impl From<&#ident> for #ident{
            fn from(value: &#ident) -> Self {
                value.to_owned()
            }
         }

    };
    output.into()
}
