// Resume tailoring: the /generate-resume text endpoint and the
// tailor-and-deliver PDF pipeline behind /generate-pdf.
// Text comes from llm_client; layout and delivery run on the blocking pool.

pub mod handlers;
pub mod pipeline;
