mod faq_document;
mod pipeline;
