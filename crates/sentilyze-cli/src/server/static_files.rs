use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};

/// The analysis form
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not found" })),
    )
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Sentilyze</title>
    <style>
        body { font-family: system-ui, sans-serif; max-width: 42rem; margin: 2rem auto; padding: 0 1rem; color: #1f2937; }
        textarea { width: 100%; min-height: 8rem; font: inherit; padding: 0.5rem; }
        fieldset { border: 1px solid #d1d5db; margin: 1rem 0; }
        button { font: inherit; padding: 0.4rem 1.2rem; }
        #output p { margin: 0.3rem 0; }
        .message { color: #b45309; }
        .error { color: #b91c1c; }
    </style>
</head>
<body>
    <h1>Tweet Sentiment Analysis</h1>
    <p>Enter the text you want to analyze:</p>

    <form id="analyze-form">
        <textarea id="text" name="text" placeholder="Type text here"></textarea>

        <fieldset>
            <legend>Select the models to use</legend>
            <label><input type="checkbox" name="naive_bayes"> Naive Bayes</label><br>
            <label><input type="checkbox" name="svm"> SVM</label><br>
            <label><input type="checkbox" name="logistic_regression"> Logistic Regression</label>
        </fieldset>

        <button type="submit">Analyze</button>
    </form>

    <div id="output"></div>

    <script>
        const form = document.getElementById('analyze-form');
        const output = document.getElementById('output');

        function show(lines, cls) {
            output.replaceChildren(...lines.map(line => {
                const p = document.createElement('p');
                p.textContent = line;
                if (cls) p.className = cls;
                return p;
            }));
        }

        form.addEventListener('submit', async (event) => {
            event.preventDefault();
            const text = document.getElementById('text').value;
            const models = {
                naive_bayes: form.naive_bayes.checked,
                svm: form.svm.checked,
                logistic_regression: form.logistic_regression.checked,
            };

            try {
                const response = await fetch('/api/analyze', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ text, models }),
                });
                const body = await response.json();
                if (response.ok) {
                    show(['Input text: ' + body.text, ...body.lines]);
                } else {
                    show([body.error], response.status === 422 ? 'message' : 'error');
                }
            } catch (err) {
                show(['Request failed: ' + err], 'error');
            }
        });
    </script>
</body>
</html>
"#;
