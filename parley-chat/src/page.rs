//! The single-page chat UI served at `/chat`.

/// Chat page markup. Posts to `/send_message`, `/clear_chat` and
/// `/save_api_key`; replies are inserted as server-rendered markup.
pub const CHAT_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Chat with API</title>
    <style>
        body, html {
            height: 100%;
            margin: 0;
            font-family: Arial, sans-serif;
            display: flex;
            flex-direction: column;
            background-color: #f8f9fa;
        }
        #chat-container {
            flex-grow: 1;
            overflow-y: auto;
            padding: 20px;
            box-sizing: border-box;
            margin-bottom: 70px;
        }
        #input-container {
            position: fixed;
            bottom: 0;
            width: 100%;
            background-color: #f8f9fa;
            padding: 10px 0;
            box-shadow: 0 -2px 5px rgba(0, 0, 0, 0.1);
        }
        #userInput {
            width: calc(100% - 40px);
            margin: 0 20px;
            padding: 10px;
            border: 1px solid #ccc;
            border-radius: 5px;
            box-sizing: border-box;
            font-size: 16px;
            height: 50px;
            background-color: #fff;
            resize: none;
        }
        #apiKeyInput {
            width: 200px;
            margin-right: 10px;
            padding: 10px;
            border: 1px solid #ccc;
            border-radius: 5px;
            box-sizing: border-box;
            font-size: 16px;
            height: 40px;
            background-color: #fff;
        }
        #loader {
            position: fixed;
            bottom: 70px;
            width: 100%;
            text-align: center;
            display: none;
        }
        #chat {
            padding: 10px;
            word-wrap: break-word;
        }
        pre {
            background-color: #f4f4f4;
            border: 1px solid #ccc;
            padding: 10px;
            border-radius: 5px;
            overflow-x: auto;
        }
        code {
            font-family: Consolas, 'Courier New', Courier, monospace;
            color: #d63384;
        }
        .bot-message {
            border: 1px solid #007BFF;
            background-color: #E9F7FF;
            border-radius: 5px;
            padding: 10px;
            margin: 10px 0;
            white-space: pre-wrap;
        }
        .user-message {
            border: 1px solid #333;
            background-color: #f0f0f0;
            border-radius: 5px;
            padding: 10px;
            margin: 10px 0;
            text-align: right;
            white-space: pre-wrap;
        }
        .control-panel {
            display: flex;
            align-items: center;
            padding: 0 20px;
        }
        button {
            padding: 10px 20px;
            background-color: #007BFF;
            color: #fff;
            border: none;
            border-radius: 5px;
            cursor: pointer;
        }
        button:hover {
            background-color: #0056b3;
        }
        p {
            text-align: center;
            margin: 0;
            color: #333;
        }
    </style>
</head>
<body>
    <div id="chat-container">
        <div id="chat"></div>
    </div>
    <div id="input-container">
        <div class="control-panel">
            <input type="password" id="apiKeyInput" placeholder="Enter API Key" onkeydown="handleApiKeyInput(event)">
            <button onclick="clearChat()">Clear Chat</button>
        </div>
        <textarea id="userInput" placeholder="Hit shift+enter to send..." onkeydown="handleKeyDown(event)"></textarea>
    </div>
    <div id="loader">Loading...</div>
    <p>To send your message, hit Shift+Enter.</p>

    <script>
        function handleKeyDown(event) {
            if (event.key === 'Enter' && event.shiftKey) {
                event.preventDefault();
                sendMessage();
            }
        }

        function handleApiKeyInput(event) {
            if (event.key === 'Enter') {
                event.preventDefault();
                saveApiKey();
            }
        }

        function appendMessage(className, html, text) {
            const div = document.createElement('div');
            div.className = className;
            if (html !== null) {
                div.innerHTML = html;
            } else {
                div.textContent = text;
            }
            document.getElementById('chat').appendChild(div);
            const container = document.getElementById('chat-container');
            container.scrollTop = container.scrollHeight;
        }

        function saveApiKey() {
            const input = document.getElementById('apiKeyInput');
            const apiKey = input.value.trim();
            if (apiKey === '') return;
            fetch('/save_api_key', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ api_key: apiKey }),
            })
            .then(response => response.text())
            .then(data => {
                console.log('API Key saved:', data);
                input.value = '';
            })
            .catch(error => console.error('Error saving API key:', error));
        }

        function sendMessage() {
            const input = document.getElementById('userInput');
            const message = input.value.trim();
            if (message === '') return;

            input.value = '';
            appendMessage('user-message', null, 'User: ' + message);

            const loader = document.getElementById('loader');
            loader.style.display = 'block';

            fetch('/send_message', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify({ prompt: message }),
            })
            .then(response => response.text())
            .then(data => {
                loader.style.display = 'none';
                appendMessage('bot-message', data, null);
            })
            .catch(error => {
                loader.style.display = 'none';
                appendMessage('bot-message', null, 'Error: ' + error);
            });
        }

        function clearChat() {
            document.getElementById('chat').innerHTML = '';
            fetch('/clear_chat', { method: 'POST' });
        }
    </script>
</body>
</html>
"#;
